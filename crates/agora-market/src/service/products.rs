use agora_cache::Mutation;
use agora_core::model::Product;
use agora_core::validation::{
    check_category, check_condition, check_description, check_id, check_name, check_price,
    check_string, check_url,
};
use agora_core::{AgoraError, DocumentId, EntityKind, ListingStatus, Result};
use chrono::Utc;

use super::{Marketplace, normalized};
use crate::input::ProductInput;

/// Validated product fields.
struct ProductFields {
    name: String,
    price: f64,
    description: String,
    condition: String,
    seller_id: String,
    image: Option<String>,
    category: String,
}

impl ProductFields {
    fn parse(input: &ProductInput) -> Result<Self> {
        let image = match input.image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(url) => Some(check_url(url)?),
        };
        Ok(Self {
            name: check_name(&input.name)?,
            price: check_price(input.price)?,
            description: check_description(&input.description)?,
            condition: check_condition(&input.condition)?,
            seller_id: check_string(&input.seller_id, "seller_id")?,
            image,
            category: check_category(&input.category)?,
        })
    }

    fn into_product(self, id: DocumentId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            date: Utc::now(),
            description: self.description,
            condition: self.condition,
            seller_id: self.seller_id,
            buyer_id: None,
            image: self.image,
            category: self.category,
            status: ListingStatus::Active,
        }
    }
}

impl Marketplace {
    /// Every product, cached under `product:all`.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.cached_all(&self.store.products).await
    }

    /// A product by id, cached under `product:<id>`.
    pub async fn product_by_id(&self, id: &str) -> Result<Product> {
        let id = DocumentId::new(check_id(id)?);
        self.cached_by_id(&self.store.products, &id).await
    }

    /// Products whose name contains `term`, ignoring case.
    pub async fn search_products_by_name(&self, term: &str) -> Result<Vec<Product>> {
        let term = check_name(term)?.to_lowercase();
        self.filtered(&self.store.products, &|p: &Product| {
            p.name.to_lowercase().contains(&term)
        })
        .await
    }

    pub async fn products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let category = check_category(category)?;
        self.filtered(&self.store.products, &|p: &Product| p.category == category)
            .await
    }

    /// Products priced within `[low, high]`; `low` defaults to zero.
    pub async fn products_by_price_range(&self, low: Option<f64>, high: f64) -> Result<Vec<Product>> {
        let low = low.map(check_price).transpose()?.unwrap_or(0.0);
        let high = check_price(high)?;
        if low > high {
            return Err(AgoraError::validation(
                "low",
                "lower bound cannot exceed upper bound",
            ));
        }
        self.filtered(&self.store.products, &|p: &Product| {
            (low..=high).contains(&p.price)
        })
        .await
    }

    pub async fn products_by_seller(&self, seller_id: &str) -> Result<Vec<Product>> {
        let seller_id = check_string(seller_id, "seller_id")?;
        self.filtered(&self.store.products, &|p: &Product| p.seller_id == seller_id)
            .await
    }

    pub async fn products_by_buyer(&self, buyer_id: &str) -> Result<Vec<Product>> {
        let buyer_id = check_string(buyer_id, "buyer_id")?;
        self.filtered(&self.store.products, &|p: &Product| {
            p.buyer_id.as_deref() == Some(buyer_id.as_str())
        })
        .await
    }

    /// Lists a new product for an existing seller.
    ///
    /// Invalidates `product:all` and caches the new product under its own key.
    pub async fn add_product(&self, input: ProductInput) -> Result<Product> {
        let fields = ProductFields::parse(&input)?;
        let seller = DocumentId::new(fields.seller_id.as_str());
        if self.store.users.find_by_id(&seller).await?.is_none() {
            return Err(AgoraError::not_found("user", seller.as_str()));
        }

        let product = self
            .store
            .products
            .insert(fields.into_product(DocumentId::generate()))
            .await?;
        self.created(&product).await?;
        Ok(normalized(product))
    }

    /// Replaces a product's fields, relisting it as active with today's date.
    pub async fn edit_product(&self, id: &str, input: ProductInput) -> Result<Product> {
        let id = DocumentId::new(check_id(id)?);
        let fields = ProductFields::parse(&input)?;

        let updated = self
            .store
            .products
            .update(fields.into_product(id.clone()))
            .await?
            .ok_or_else(|| AgoraError::not_found("product", id.as_str()))?;
        self.changed(Mutation::update(EntityKind::Product, id)).await?;
        Ok(normalized(updated))
    }

    pub async fn remove_product(&self, id: &str) -> Result<Product> {
        let id = DocumentId::new(check_id(id)?);
        let removed = self
            .store
            .products
            .delete(&id)
            .await?
            .ok_or_else(|| AgoraError::not_found("product", id.as_str()))?;
        self.changed(Mutation::delete(EntityKind::Product, id)).await?;
        Ok(normalized(removed))
    }
}
