pub(crate) mod flight_plan;
mod loadsheet;
pub(crate) mod loadsheet_status;
pub(crate) mod response_common;
pub(crate) mod variable;
