//! User-facing messages shared by the route handlers

/// Generic error message for failures the user cannot fix
pub const ERROR_SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

pub const ERROR_INVALID_EMAIL: &str = "Please enter a valid email address";

pub const ERROR_ALREADY_SUBSCRIBED: &str = "Email already subscribed";

pub const SUBSCRIBE_SUCCESS_MESSAGE: &str = "Thank you! We will be in touch soon.";

pub const REPORT_SENT_MESSAGE: &str = "Daily report sent";

pub const REPORT_ALREADY_SENT_MESSAGE: &str = "Daily report already sent today";

pub const ERROR_REPORT_SEND_FAILED: &str = "Failed to send email";

pub const ERROR_REPORT_GENERATION_FAILED: &str = "Failed to generate report";
