mod code;
mod extensions;
mod files;
mod lists;
mod math;
mod tables;
