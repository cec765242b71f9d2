use async_graphql::ID;
use uuid::Uuid;

use crate::gql::error::ResultExt;

/// Parse a GraphQL ID into a UUID, naming the entity in the error.
pub fn parse_id(id: &ID, entity: &str) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).gql_err(&format!("Invalid {entity} ID"))
}
