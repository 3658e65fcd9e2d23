pub mod conf;
pub mod decode;
pub mod render;
pub mod run;
pub mod status;
pub mod tabulate;
