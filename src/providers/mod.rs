pub mod groq;
pub mod http_errors;
