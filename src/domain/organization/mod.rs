//! Organization domain module
//!
//! Organizations are the teams a user can subscribe to. A user holds at most
//! one subscription, recorded as the team reference on the user record.

mod abbreviation;
mod entity;
mod pagination;
mod validation;

pub use abbreviation::team_abbreviation;
pub use entity::{Organization, OrganizationId, Player, PlayerId, PlayerUser};
pub use pagination::{
    OrganizationPage, OrganizationQuery, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT,
};
pub use validation::{
    validate_organization_id, validate_page_params, validate_player_id,
    OrganizationValidationError,
};
pub(crate) use validation::validate_resource_id;
