// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod leagues;
pub mod picks;
pub mod sports;
pub mod users;
