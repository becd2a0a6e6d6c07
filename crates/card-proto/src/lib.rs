pub mod clock;
pub mod config;
pub mod platform;
pub mod poller;
pub mod presence;
pub mod spring;
pub mod task;
pub mod tilt;
pub mod view;
