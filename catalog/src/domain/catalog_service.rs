//! Catalog write-path domain service.
//!
//! Implements the command driving port: validating content, assigning slugs
//! that stay unique within their family, guarding edits by authorship, and
//! recording reviews against existing entries.
//!
//! Slug assignment counts the existing family members and appends
//! `count + 1`, so the second `cafe` becomes `cafe-2`. Removals leave gaps
//! that are never reused; when a freshly counted slug still collides, the
//! store's uniqueness guard reports it, the family is recounted once, and a
//! second collision surfaces to the caller as a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::Error;
use crate::domain::ports::{
    AddReviewRequest, AddReviewResponse, CatalogCommand, CreateEntryRequest, CreateEntryResponse,
    EntryRepository, EntryRepositoryError, ReviewRepository, UpdateEntryRequest,
    UpdateEntryResponse,
};
use crate::domain::{EntryContent, NewCatalogEntry, NewReview, NewReviewDraft, Slug};

use super::repository_errors::{
    map_entry_repository_error, map_review_repository_error, map_validation_error,
};

/// Catalog service implementing the command driving port.
#[derive(Clone)]
pub struct CatalogCommandService<E, R> {
    entry_repo: Arc<E>,
    review_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<E, R> CatalogCommandService<E, R> {
    /// Create a new command service over the entry and review stores.
    pub fn new(entry_repo: Arc<E>, review_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry_repo,
            review_repo,
            clock,
        }
    }
}

impl<E, R> CatalogCommandService<E, R>
where
    E: EntryRepository,
{
    async fn next_family_slug(&self, base: &Slug) -> Result<Slug, Error> {
        let family = self
            .entry_repo
            .slugs_in_family(base)
            .await
            .map_err(map_entry_repository_error)?;
        Ok(Slug::with_family_count(base, family.len()))
    }
}

#[async_trait]
impl<E, R> CatalogCommand for CatalogCommandService<E, R>
where
    E: EntryRepository,
    R: ReviewRepository,
{
    async fn create_entry(
        &self,
        request: CreateEntryRequest,
    ) -> Result<CreateEntryResponse, Error> {
        let content = EntryContent::new(request.content).map_err(map_validation_error)?;
        let base = content.base_slug().clone();
        let slug = self.next_family_slug(&base).await?;
        let new = NewCatalogEntry::new(content, slug, request.author_id, self.clock.utc());

        match self.entry_repo.insert(new.clone()).await {
            Ok(entry) => Ok(CreateEntryResponse { entry }),
            Err(EntryRepositoryError::SlugTaken { slug }) => {
                tracing::warn!(
                    slug = %slug,
                    "assigned slug already taken, recounting family"
                );
                let retry = self.next_family_slug(&base).await?;
                let entry = self
                    .entry_repo
                    .insert(new.with_slug(retry))
                    .await
                    .map_err(map_entry_repository_error)?;
                Ok(CreateEntryResponse { entry })
            }
            Err(error) => Err(map_entry_repository_error(error)),
        }
    }

    async fn update_entry(
        &self,
        request: UpdateEntryRequest,
    ) -> Result<UpdateEntryResponse, Error> {
        let content = EntryContent::new(request.content).map_err(map_validation_error)?;
        let existing = self
            .entry_repo
            .find_by_id(request.entry_id)
            .await
            .map_err(map_entry_repository_error)?
            .ok_or_else(|| Error::not_found(format!("catalog entry {} not found", request.entry_id)))?;

        if existing.author_id() != request.author_id {
            return Err(Error::forbidden("only the author may edit this entry"));
        }

        let base = content.base_slug().clone();
        let slug = if existing.name() == content.name() {
            existing.slug().clone()
        } else {
            self.next_family_slug(&base).await?
        };
        let updated = existing.with_content(content, slug);

        match self.entry_repo.update(updated.clone()).await {
            Ok(entry) => Ok(UpdateEntryResponse { entry }),
            Err(EntryRepositoryError::SlugTaken { slug }) => {
                tracing::warn!(
                    slug = %slug,
                    entry_id = %request.entry_id,
                    "replacement slug already taken, recounting family"
                );
                let retry = self.next_family_slug(&base).await?;
                let entry = self
                    .entry_repo
                    .update(updated.with_slug(retry))
                    .await
                    .map_err(map_entry_repository_error)?;
                Ok(UpdateEntryResponse { entry })
            }
            Err(error) => Err(map_entry_repository_error(error)),
        }
    }

    async fn add_review(&self, request: AddReviewRequest) -> Result<AddReviewResponse, Error> {
        let new = NewReview::new(NewReviewDraft {
            entry_id: request.entry_id,
            author_id: request.author_id,
            text: request.text,
            rating: request.rating,
            created_at: self.clock.utc(),
        })
        .map_err(map_validation_error)?;

        self.entry_repo
            .find_by_id(request.entry_id)
            .await
            .map_err(map_entry_repository_error)?
            .ok_or_else(|| Error::not_found(format!("catalog entry {} not found", request.entry_id)))?;

        let review = self
            .review_repo
            .insert(new)
            .await
            .map_err(map_review_repository_error)?;
        Ok(AddReviewResponse { review })
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
