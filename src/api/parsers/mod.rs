mod spond;

pub use spond::{find_group_members, parse_events, parse_login_token};
