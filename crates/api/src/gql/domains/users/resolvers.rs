use async_graphql::{Context, Object, Result, ID};

use crate::gql::common::helpers::parse_id;
use crate::gql::common::types::{MutationError, ERR_INVALID_INPUT};
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{users, CreateUserData};

use super::types::{CreateUserInput, CreateUserPayload, User};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// Look a user up by ID or, when no ID is given, by email.
    async fn user(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        email: Option<String>,
    ) -> Result<Option<User>> {
        let state = ctx.data::<AppState>()?;

        let row = match (id, email) {
            (Some(id), _) => users::get_by_id(&state.db, parse_id(&id, "user")?).await,
            (None, Some(email)) => users::get_by_email(&state.db, email.trim()).await,
            (None, None) => return Err(GqlError::new("Either id or email is required").into()),
        }
        .map_err(GqlError::from)?;

        Ok(row.map(User::from))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> Result<CreateUserPayload> {
        let state = ctx.data::<AppState>()?;

        let email = input.email.trim().to_lowercase();
        if !validator::validate_email(email.as_str()) {
            return Ok(CreateUserPayload::error(MutationError::new(
                ERR_INVALID_INPUT,
                "Please provide a valid email address.",
            )));
        }

        let data = CreateUserData {
            email,
            display_name: input.display_name.filter(|n| !n.trim().is_empty()),
        };

        match users::create(&state.db, data).await {
            Ok(row) => {
                tracing::info!(user_id = %row.id, "Created user");
                Ok(CreateUserPayload {
                    user: Some(row.into()),
                    errors: None,
                })
            }
            Err(e) => Ok(CreateUserPayload::error(MutationError::from_storage(
                &e,
                "A user with that email address already exists.",
                "Referenced record does not exist.",
            ))),
        }
    }
}
