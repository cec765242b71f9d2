use async_graphql::MergedObject;

use crate::gql::domains::leagues::LeagueMutation;
use crate::gql::domains::picks::PickMutation;
use crate::gql::domains::users::UserMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(LeagueMutation, PickMutation, UserMutation);
