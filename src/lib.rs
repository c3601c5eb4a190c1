pub mod api_doc;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod email_templates;
pub mod kv_store;
pub mod report_service;
pub mod routes;
pub mod startup;
pub mod subscription_service;
pub mod telemetry;
