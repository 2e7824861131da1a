//! Ingredient and tag catalogue

use campus_core::{Snowflake, Tag};
use tracing::{info, instrument};

use crate::dto::{CreateTagRequest, IngredientResponse, TagResponse};

use super::access::{load_caller, require_admin};
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct CatalogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list_ingredients(&self) -> ServiceResult<Vec<IngredientResponse>> {
        let ingredients = self.ctx.ingredient_repo().list().await?;
        Ok(ingredients.into_iter().map(IngredientResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_tags(&self) -> ServiceResult<Vec<TagResponse>> {
        let tags = self.ctx.tag_repo().list().await?;
        Ok(tags.into_iter().map(TagResponse::from).collect())
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_tag(&self, caller_id: Snowflake, request: CreateTagRequest) -> ServiceResult<TagResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let tag = Tag {
            id: self.ctx.generate_id(),
            name: request.name.trim().to_string(),
            kind: request.kind.trim().to_lowercase(),
        };
        self.ctx.tag_repo().create(&tag).await?;

        info!(tag_id = %tag.id, kind = %tag.kind, "Tag created");
        Ok(tag.into())
    }
}
