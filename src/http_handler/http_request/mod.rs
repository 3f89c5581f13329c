use super::http_response::{flight_plan, loadsheet_status, variable};

pub(crate) mod flight_plan_get;
pub(crate) mod loadsheet_post;
pub(crate) mod loadsheet_status_get;
pub(crate) mod request_common;
pub(crate) mod variable_get;
pub(crate) mod variable_put;
