mod builder;
mod common;
mod draft;
mod routing;
