use agora_cache::Mutation;
use agora_core::model::Post;
use agora_core::validation::{
    check_category, check_condition, check_description, check_id, check_name, check_price,
    check_string,
};
use agora_core::{AgoraError, DocumentId, EntityKind, ListingStatus, Result};
use chrono::Utc;

use super::{Marketplace, normalized};
use crate::input::PostInput;

fn parse_post(id: DocumentId, input: &PostInput) -> Result<Post> {
    Ok(Post {
        id,
        buyer_id: check_string(&input.buyer_id, "buyer_id")?,
        seller_id: None,
        item: check_name(&input.item)?,
        category: check_category(&input.category)?,
        price: check_price(input.price)?,
        condition: check_condition(&input.condition)?,
        date: Utc::now(),
        description: check_description(&input.description)?,
        status: ListingStatus::Active,
    })
}

impl Marketplace {
    /// Every post, cached under `post:all`.
    pub async fn posts(&self) -> Result<Vec<Post>> {
        self.cached_all(&self.store.posts).await
    }

    /// A post by id, cached under `post:<id>`.
    pub async fn post_by_id(&self, id: &str) -> Result<Post> {
        let id = DocumentId::new(check_id(id)?);
        self.cached_by_id(&self.store.posts, &id).await
    }

    /// Posts whose item contains `term`, ignoring case.
    pub async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        let term = check_name(term)?.to_lowercase();
        self.filtered(&self.store.posts, &|p: &Post| {
            p.item.to_lowercase().contains(&term)
        })
        .await
    }

    pub async fn posts_by_seller(&self, seller_id: &str) -> Result<Vec<Post>> {
        let seller_id = check_string(seller_id, "seller_id")?;
        self.filtered(&self.store.posts, &|p: &Post| {
            p.seller_id.as_deref() == Some(seller_id.as_str())
        })
        .await
    }

    pub async fn posts_by_buyer(&self, buyer_id: &str) -> Result<Vec<Post>> {
        let buyer_id = check_string(buyer_id, "buyer_id")?;
        self.filtered(&self.store.posts, &|p: &Post| p.buyer_id == buyer_id)
            .await
    }

    pub async fn add_post(&self, input: PostInput) -> Result<Post> {
        let post = parse_post(DocumentId::generate(), &input)?;
        let post = self.store.posts.insert(post).await?;
        self.created(&post).await?;
        Ok(normalized(post))
    }

    /// Replaces a post's fields, relisting it as active with today's date.
    pub async fn edit_post(&self, id: &str, input: PostInput) -> Result<Post> {
        let id = DocumentId::new(check_id(id)?);
        let post = parse_post(id.clone(), &input)?;
        let updated = self
            .store
            .posts
            .update(post)
            .await?
            .ok_or_else(|| AgoraError::not_found("post", id.as_str()))?;
        self.changed(Mutation::update(EntityKind::Post, id)).await?;
        Ok(normalized(updated))
    }

    pub async fn remove_post(&self, id: &str) -> Result<Post> {
        let id = DocumentId::new(check_id(id)?);
        let removed = self
            .store
            .posts
            .delete(&id)
            .await?
            .ok_or_else(|| AgoraError::not_found("post", id.as_str()))?;
        self.changed(Mutation::delete(EntityKind::Post, id)).await?;
        Ok(normalized(removed))
    }

    /// Takes an active post off the board. Only its buyer may do so.
    ///
    /// # Errors
    ///
    /// `NotFound` if the post does not exist or `user_id` is not its buyer,
    /// `Conflict` if the post is already inactive.
    pub async fn retrieve_post(&self, id: &str, user_id: &str) -> Result<Post> {
        self.set_post_status(id, user_id, ListingStatus::Active, ListingStatus::Inactive)
            .await
    }

    /// Puts an inactive post back on the board with today's date.
    ///
    /// # Errors
    ///
    /// `NotFound` if the post does not exist or `user_id` is not its buyer,
    /// `Conflict` if the post is already active.
    pub async fn repost_post(&self, id: &str, user_id: &str) -> Result<Post> {
        self.set_post_status(id, user_id, ListingStatus::Inactive, ListingStatus::Active)
            .await
    }

    async fn set_post_status(
        &self,
        id: &str,
        user_id: &str,
        from: ListingStatus,
        to: ListingStatus,
    ) -> Result<Post> {
        let id = DocumentId::new(check_id(id)?);
        let user_id = check_string(user_id, "user_id")?;

        let post_id = id.clone();
        let updated = self
            .store
            .posts
            .modify(
                &id,
                Box::new(move |post: &mut Post| {
                    if !post.is_owned_by(&user_id) {
                        return Err(AgoraError::not_found("user", user_id));
                    }
                    if post.status != from {
                        return Err(AgoraError::conflict(format!(
                            "post '{post_id}' is already {}",
                            post.status.as_str()
                        )));
                    }
                    post.status = to;
                    if to == ListingStatus::Active {
                        post.date = Utc::now();
                    }
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| AgoraError::not_found("post", id.as_str()))?;
        self.changed(Mutation::update(EntityKind::Post, id)).await?;
        Ok(normalized(updated))
    }
}
