use agora_cache::{CacheKey, Mutation};
use agora_core::model::{Comment, User};
use agora_core::validation::{
    capitalize_name, check_email, check_id, check_person_name, check_rating, check_string,
};
use agora_core::{AgoraError, DocumentId, EntityKind, Result};

use super::Marketplace;
use crate::input::{CommentInput, NewUser, UserEdit};
use crate::store::Change;

/// A uid is only trimmed, but it must also be usable as a `user:<id>` key.
fn user_id(value: &str, field: &str) -> Result<DocumentId> {
    let id = DocumentId::new(check_string(value, field)?);
    CacheKey::for_document(EntityKind::User, &id)?;
    Ok(id)
}

fn comment_text(value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        None | Some("") => Ok(String::new()),
        Some(text) => check_string(text, "comment"),
    }
}

impl Marketplace {
    /// A user by id, cached under `user:<id>`.
    pub async fn user_by_id(&self, id: &str) -> Result<User> {
        let id = user_id(id, "_id")?;
        self.cached_by_id(&self.store.users, &id).await
    }

    /// The users among `ids` that exist, in id order.
    pub async fn users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        let ids = ids
            .iter()
            .map(|id| user_id(id, "_id"))
            .collect::<Result<Vec<_>>>()?;
        self.filtered(&self.store.users, &|u: &User| ids.contains(&u.id))
            .await
    }

    /// Registers a member under their identity-provider uid.
    ///
    /// # Errors
    ///
    /// `Conflict` if the uid is already registered.
    pub async fn add_user(&self, input: NewUser) -> Result<User> {
        let favorite = match input.favorite.as_deref() {
            Some(product) => vec![check_id(product)?],
            None => Vec::new(),
        };
        let user = User {
            id: user_id(&input.id, "_id")?,
            email: check_email(&input.email)?,
            firstname: capitalize_name(&check_person_name(&input.firstname, "firstname")?),
            lastname: capitalize_name(&check_person_name(&input.lastname, "lastname")?),
            favorite,
            comments: Vec::new(),
        };

        let user = self.store.users.insert(user).await?;
        self.created(&user).await?;
        Ok(user)
    }

    pub async fn edit_user(&self, id: &str, edit: UserEdit) -> Result<User> {
        let id = user_id(id, "_id")?;
        let email = check_email(&edit.email)?;
        let firstname = capitalize_name(&check_person_name(&edit.firstname, "firstname")?);
        let lastname = capitalize_name(&check_person_name(&edit.lastname, "lastname")?);

        self.modify_user(
            &id,
            Box::new(move |user: &mut User| {
                user.email = email;
                user.firstname = firstname;
                user.lastname = lastname;
                Ok(())
            }),
        )
        .await
    }

    /// Adds a product to the user's favorites and returns the new list.
    pub async fn add_favorite(&self, id: &str, product_id: &str) -> Result<Vec<String>> {
        let id = user_id(id, "_id")?;
        let product_id = check_id(product_id)?;

        let user = self
            .modify_user(
                &id,
                Box::new(move |user: &mut User| {
                    if user.favorite.contains(&product_id) {
                        return Err(AgoraError::conflict(format!(
                            "product '{product_id}' is already a favorite"
                        )));
                    }
                    user.favorite.push(product_id);
                    Ok(())
                }),
            )
            .await?;
        Ok(user.favorite)
    }

    /// Removes a product from the user's favorites and returns the new list.
    pub async fn remove_favorite(&self, id: &str, product_id: &str) -> Result<Vec<String>> {
        let id = user_id(id, "_id")?;
        let product_id = check_id(product_id)?;

        let user = self
            .modify_user(
                &id,
                Box::new(move |user: &mut User| {
                    let before = user.favorite.len();
                    user.favorite.retain(|p| *p != product_id);
                    if user.favorite.len() == before {
                        return Err(AgoraError::not_found("favorite", product_id));
                    }
                    Ok(())
                }),
            )
            .await?;
        Ok(user.favorite)
    }

    /// Leaves a rating from `comment_id` on the profile of `user_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if either user is missing, `Conflict` if the commenter
    /// already rated this user.
    pub async fn add_comment(&self, input: CommentInput) -> Result<User> {
        let id = user_id(&input.user_id, "user_id")?;
        let commenter = user_id(&input.comment_id, "comment_id")?;
        let rating = check_rating(input.rating)?;
        let text = comment_text(input.comment.as_deref())?;

        self.find_user(&commenter).await?;
        let target = id.clone();
        self.modify_user(
            &id,
            Box::new(move |user: &mut User| {
                if user.comment_from(commenter.as_str()).is_some() {
                    return Err(AgoraError::conflict(format!(
                        "user '{commenter}' already commented on '{target}'"
                    )));
                }
                user.comments.push(Comment {
                    id: DocumentId::generate(),
                    comment_id: commenter.as_str().to_string(),
                    rating,
                    comment: text,
                });
                Ok(())
            }),
        )
        .await
    }

    /// Replaces the rating and text of an existing comment.
    ///
    /// # Errors
    ///
    /// `NotFound` if either user or the comment is missing, `Validation` if
    /// neither the rating nor the text changes.
    pub async fn edit_comment(&self, input: CommentInput) -> Result<User> {
        let id = user_id(&input.user_id, "user_id")?;
        let commenter = user_id(&input.comment_id, "comment_id")?;
        let rating = check_rating(input.rating)?;
        let text = comment_text(input.comment.as_deref())?;

        self.find_user(&commenter).await?;
        self.modify_user(
            &id,
            Box::new(move |user: &mut User| {
                let comment = user
                    .comments
                    .iter_mut()
                    .find(|c| c.comment_id == commenter.as_str())
                    .ok_or_else(|| AgoraError::not_found("comment", commenter.as_str()))?;
                if comment.rating == rating && comment.comment == text {
                    return Err(AgoraError::validation("comment", "no change made"));
                }
                comment.rating = rating;
                comment.comment = text;
                Ok(())
            }),
        )
        .await
    }

    /// The comment `comment_id` left on `user_id`, if any.
    pub async fn comment(&self, user_id: &str, comment_id: &str) -> Result<Option<Comment>> {
        let commenter = check_string(comment_id, "comment_id")?;
        let user = self.user_by_id(user_id).await?;
        Ok(user.comment_from(&commenter).cloned())
    }

    /// Mean rating of a user, or `None` if nobody rated them yet.
    pub async fn user_rating(&self, user_id: &str) -> Result<Option<f64>> {
        Ok(self.user_by_id(user_id).await?.rating())
    }

    /// Uncached read, used to check that a user exists.
    async fn find_user(&self, id: &DocumentId) -> Result<User> {
        self.store
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgoraError::not_found("user", id.as_str()))
    }

    /// Edits a user in one atomic step, then invalidates its keys.
    async fn modify_user(&self, id: &DocumentId, change: Change<'_, User>) -> Result<User> {
        let saved = self
            .store
            .users
            .modify(id, change)
            .await?
            .ok_or_else(|| AgoraError::not_found("user", id.as_str()))?;
        self.changed(Mutation::update(EntityKind::User, id.clone()))
            .await?;
        Ok(saved)
    }
}
