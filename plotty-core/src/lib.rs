pub mod block;
pub mod cache;
pub mod cli;
pub mod conf;
pub mod logging;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod style;
pub mod util;
