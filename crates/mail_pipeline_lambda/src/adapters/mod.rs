pub mod completion;
pub mod logger;
pub mod notifier;
pub mod object_store;
