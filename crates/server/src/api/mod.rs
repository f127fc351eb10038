mod handlers;
mod routes;
mod search;

pub use routes::create_router;
