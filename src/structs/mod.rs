pub mod rps;
pub mod session;
pub mod time_parse;
pub mod validated_url;
