use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{advertisement, category, errors::db_error, user};
use crate::{
    errors::ServiceError,
    media::MediaStorage,
    pagination::{fetch_page, Page, Pagination},
    projections::{self, AdvertisementDetail, AdvertisementSummary},
};

/// Creation input; the author is referenced by username, the category by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdvertisementInput {
    pub name: String,
    pub author: String,
    pub price: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub category_id: i32,
}

/// Partial update limited to the descriptive fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdvertisementInput {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub description: Option<String>,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// One page of advertisements, most expensive first.
pub async fn list_advertisements(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Page<AdvertisementSummary>, ServiceError> {
    let (page, per_page) = opts.normalize();
    let paginator = advertisement::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(advertisement::Column::Price)
        .order_by_asc(advertisement::Column::Id)
        .paginate(db, per_page);
    let found = fetch_page(paginator, page).await?;
    Ok(found.map(|(ad, author)| AdvertisementSummary::build(ad, author)))
}

async fn find(db: &DatabaseConnection, id: i32) -> Result<advertisement::Model, ServiceError> {
    advertisement::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("advertisement"))
}

pub async fn get_advertisement(
    db: &DatabaseConnection,
    media: &MediaStorage,
    id: i32,
) -> Result<AdvertisementDetail, ServiceError> {
    let ad = find(db, id).await?;
    Ok(projections::advertisement_detail(db, media, ad).await?)
}

/// Create an advertisement; an unknown author or category is a validation error.
#[instrument(skip(db, media, input), fields(author = %input.author, category_id = input.category_id))]
pub async fn create_advertisement(
    db: &DatabaseConnection,
    media: &MediaStorage,
    input: CreateAdvertisementInput,
) -> Result<AdvertisementDetail, ServiceError> {
    let author = user::find_by_username(db, input.author.trim())
        .await?
        .ok_or_else(|| ServiceError::Validation(format!("author {:?} does not exist", input.author)))?;
    let category = category::Entity::find_by_id(input.category_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::Validation(format!("category {} does not exist", input.category_id)))?;

    let created = advertisement::create(
        db,
        advertisement::NewAdvertisement {
            name: input.name,
            author_id: author.id,
            price: input.price,
            description: input.description,
            image: input.image,
            is_published: input.is_published,
            category_id: category.id,
        },
    )
    .await?;
    info!(advertisement_id = created.id, "advertisement_created");
    Ok(projections::advertisement_detail(db, media, created).await?)
}

#[instrument(skip(db, media, input))]
pub async fn update_advertisement(
    db: &DatabaseConnection,
    media: &MediaStorage,
    id: i32,
    input: UpdateAdvertisementInput,
) -> Result<AdvertisementDetail, ServiceError> {
    let found = find(db, id).await?;
    let mut am: advertisement::ActiveModel = found.clone().into();
    if let Some(name) = input.name.as_deref() {
        am.name = Set(advertisement::validate_name(name)?);
    }
    if let Some(price) = input.price {
        am.price = Set(advertisement::validate_price(price)?);
    }
    if let Some(description) = input.description {
        am.description = Set(Some(description));
    }
    let updated = if am.is_changed() { am.update(db).await.map_err(db_error)? } else { found };
    info!(advertisement_id = id, "advertisement_updated");
    Ok(projections::advertisement_detail(db, media, updated).await?)
}

#[instrument(skip(db))]
pub async fn delete_advertisement(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let res = advertisement::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("advertisement"));
    }
    info!(advertisement_id = id, "advertisement_deleted");
    Ok(())
}

/// Store `upload` and point the advertisement at it. The previous file stays on disk.
#[instrument(skip(db, media, upload), fields(size = upload.bytes.len()))]
pub async fn set_image(
    db: &DatabaseConnection,
    media: &MediaStorage,
    id: i32,
    upload: ImageUpload,
) -> Result<AdvertisementDetail, ServiceError> {
    let found = find(db, id).await?;
    let rel = media
        .save_image(upload.file_name.as_deref(), upload.content_type.as_deref(), &upload.bytes)
        .await?;
    let mut am: advertisement::ActiveModel = found.into();
    am.image = Set(Some(rel));
    let updated = am.update(db).await.map_err(db_error)?;
    info!(advertisement_id = id, "advertisement_image_set");
    Ok(projections::advertisement_detail(db, media, updated).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use crate::user_service::{self, CreateUserInput, UpdateUserInput};
    use sea_orm::EntityTrait;

    fn media() -> MediaStorage {
        let root = std::env::temp_dir().join(format!("svc_ads_{}", uuid::Uuid::new_v4()));
        MediaStorage::new(root, "/media", "")
    }

    async fn seed(db: &DatabaseConnection) -> Result<(i32, i32), anyhow::Error> {
        let u = user_service::create_user(
            db,
            CreateUserInput {
                username: "seller".into(),
                first_name: "Sam".into(),
                last_name: "Seller".into(),
                password: "Passw0rd".into(),
                role: None,
                age: None,
                locations: vec!["Paris".into(), "Rome".into()],
            },
        )
        .await?;
        let c = category::create(db, "Bikes").await?;
        Ok((u.id, c.id))
    }

    fn ad(name: &str, price: i32, category_id: i32) -> CreateAdvertisementInput {
        CreateAdvertisementInput {
            name: name.into(),
            author: "seller".into(),
            price,
            description: None,
            image: None,
            is_published: false,
            category_id,
        }
    }

    #[tokio::test]
    async fn create_returns_full_detail() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (uid, cid) = seed(&db).await?;

        let mut input = ad("Road bike", 1500, cid);
        input.image = Some("ads/bike.jpg".into());
        let d = create_advertisement(&db, &media, input).await?;
        assert_eq!(d.author_id, uid);
        assert_eq!(d.author, "seller");
        assert_eq!(d.address, vec!["Paris".to_string(), "Rome".to_string()]);
        assert_eq!(d.category_name, "Bikes");
        assert_eq!(d.image.as_deref(), Some("/media/ads/bike.jpg"));
        assert_eq!(get_advertisement(&db, &media, d.id).await?, d);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_references_are_client_errors() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (_, cid) = seed(&db).await?;

        let err = create_advertisement(&db, &media, ad("Ghost", 1, cid + 100)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let mut nobody = ad("Ghost", 1, cid);
        nobody.author = "nobody".into();
        assert!(create_advertisement(&db, &media, nobody).await.unwrap_err().is_client_error());
        assert_eq!(advertisement::Entity::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_is_restricted_and_partial() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (_, cid) = seed(&db).await?;
        let created = create_advertisement(&db, &media, ad("Lamp", 10, cid)).await?;

        let patch = UpdateAdvertisementInput { price: Some(12), ..Default::default() };
        let updated = update_advertisement(&db, &media, created.id, patch).await?;
        assert_eq!(updated.price, 12);
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.is_published, created.is_published);

        let bad = UpdateAdvertisementInput { price: Some(-5), ..Default::default() };
        assert!(update_advertisement(&db, &media, created.id, bad).await.unwrap_err().is_client_error());

        delete_advertisement(&db, created.id).await?;
        assert!(matches!(get_advertisement(&db, &media, created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn second_page_of_seven_holds_two() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (_, cid) = seed(&db).await?;
        for price in 1..=7 {
            create_advertisement(&db, &media, ad(&format!("Item {price}"), price * 100, cid)).await?;
        }
        let first = list_advertisements(&db, Pagination::new(1, 5)).await?;
        assert_eq!(first.items[0].price, 700);
        assert_eq!(first.items[0].author, "seller");

        let second = list_advertisements(&db, Pagination::new(2, 5)).await?;
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.pages_number, 2);
        assert_eq!(second.total, 7);
        assert_eq!(second.items[1].price, 100);
        Ok(())
    }

    #[tokio::test]
    async fn publishing_changes_author_counter() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (uid, cid) = seed(&db).await?;
        let mut published = ad("Tent", 50, cid);
        published.is_published = true;
        create_advertisement(&db, &media, published).await?;
        let draft = create_advertisement(&db, &media, ad("Stove", 20, cid)).await?;
        assert_eq!(user_service::get_user(&db, uid).await?.total_advertisements, 1);

        let mut am: advertisement::ActiveModel =
            advertisement::Entity::find_by_id(draft.id).one(&db).await?.unwrap().into();
        am.is_published = Set(true);
        am.update(&db).await?;
        assert_eq!(user_service::get_user(&db, uid).await?.total_advertisements, 2);

        let untouched = user_service::update_user(&db, uid, UpdateUserInput::default()).await?;
        assert_eq!(untouched.total_advertisements, 2);
        Ok(())
    }

    #[tokio::test]
    async fn set_image_replaces_reference() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let media = media();
        let (_, cid) = seed(&db).await?;
        let created = create_advertisement(&db, &media, ad("Chair", 5, cid)).await?;
        assert!(created.image.is_none());

        let upload = |name: &str| ImageUpload {
            file_name: Some(name.to_string()),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xff, 0xd8, 0xff],
        };
        let first = set_image(&db, &media, created.id, upload("chair.jpg")).await?;
        let second = set_image(&db, &media, created.id, upload("chair2.jpg")).await?;
        let url = second.image.clone().unwrap();
        assert!(url.starts_with("/media/ads/"));
        assert!(url.ends_with("_chair2.jpg"));
        assert_ne!(first.image, second.image);

        let missing = set_image(&db, &media, created.id + 1, upload("x.jpg")).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
        tokio::fs::remove_dir_all(media.root()).await.ok();
        Ok(())
    }
}
