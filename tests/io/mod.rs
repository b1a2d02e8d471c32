mod config;
mod gravity;
