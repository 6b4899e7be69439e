// Composition root.
//
// Responsibilities
// - Read config from the environment.
// - Pick the state store implementation and seed demo data on first start.
// - Wire the store, clock and id source into the context handlers.
// - Expose the HTTP routes and the GraphQL schema.

pub mod config;
pub mod graphql;
pub mod http;
pub mod seed;
pub mod state;
