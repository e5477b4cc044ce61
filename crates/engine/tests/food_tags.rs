use sea_orm::{Database, DatabaseConnection};

use engine::{DishCreate, DishFilter, Engine, EngineError, ErrorKind, NamedPatch, Price};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn tag_names(tags: &[engine::FoodTag]) -> Vec<&str> {
    tags.iter().map(|tag| tag.name.as_str()).collect()
}

#[tokio::test]
async fn food_tags_are_listed_by_name_and_searchable() {
    let (engine, _db) = engine_with_db().await;

    for name in ["Vegano", "Sin gluten", "Sin lácteos", "Picante"] {
        engine.create_food_tag(name).await.unwrap();
    }

    let all = engine.find_food_tags(None).await.unwrap();
    assert_eq!(
        tag_names(&all),
        ["Picante", "Sin gluten", "Sin lácteos", "Vegano"]
    );

    let lacteos = engine.find_food_tags(Some("LACTEOS")).await.unwrap();
    assert_eq!(tag_names(&lacteos), ["Sin lácteos"]);

    let sin = engine.find_food_tags(Some("sin ")).await.unwrap();
    assert_eq!(tag_names(&sin), ["Sin gluten", "Sin lácteos"]);
}

#[tokio::test]
async fn food_tag_lifecycle() {
    let (engine, _db) = engine_with_db().await;

    let tag = engine.create_food_tag("Vegano").await.unwrap();
    assert!(tag.meta.is_active);
    assert!(!tag.meta.deleted);

    let dup = engine.create_food_tag("Vegano").await.unwrap_err();
    assert_eq!(dup, EngineError::ExistingKey("Vegano".to_string()));

    let renamed = engine
        .update_food_tag(tag.meta.id, NamedPatch::default().name("Vegetariano"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Vegetariano");
    assert!(renamed.meta.updated_at >= tag.meta.updated_at);

    engine.delete_food_tag(tag.meta.id).await.unwrap();
    assert_eq!(
        engine.food_tag(tag.meta.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(engine.count_food_tags().await.unwrap(), 0);

    let reused = engine.create_food_tag("Vegetariano").await.unwrap();
    assert_ne!(reused.meta.id, tag.meta.id);
}

#[tokio::test]
async fn deleted_tag_cannot_be_assigned() {
    let (engine, _db) = engine_with_db().await;

    let tag = engine.create_food_tag("Picante").await.unwrap();
    engine.delete_food_tag(tag.meta.id).await.unwrap();

    let err = engine
        .create_dish(DishCreate::new("Chili", Price::new(900).unwrap()).tags(vec![tag.meta.id]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference(_)));
}

#[tokio::test]
async fn deleted_tag_still_filters_through_the_association() {
    let (engine, _db) = engine_with_db().await;

    let tag = engine.create_food_tag("Picante").await.unwrap();
    engine
        .create_dish(DishCreate::new("Chili", Price::new(900).unwrap()).tags(vec![tag.meta.id]))
        .await
        .unwrap();
    engine.delete_food_tag(tag.meta.id).await.unwrap();

    let found = engine
        .find_dishes(&DishFilter::default().tag(tag.meta.id))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].tags.is_empty());
}
