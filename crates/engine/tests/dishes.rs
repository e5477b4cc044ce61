use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use engine::{
    DishCreate, DishFilter, DishPatch, DishSection, Engine, EngineError, ErrorKind, Price,
    Repository, StatusFilter, dishes,
};
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

fn price(raw: &str) -> Price {
    raw.parse().unwrap()
}

fn names(dishes: &[engine::Dish]) -> Vec<&str> {
    dishes.iter().map(|dish| dish.name.as_str()).collect()
}

#[tokio::test]
async fn search_is_accent_and_case_insensitive() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let flan = engine
        .create_dish(DishCreate::new("Flan", price("4200.00")).category(postres.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Pizza Margherita", price("9500")))
        .await
        .unwrap();

    for query in ["flan", "FLÁN", "  Flán "] {
        let found = engine
            .find_dishes(&DishFilter::default().search(query))
            .await
            .unwrap();
        assert_eq!(found.len(), 1, "query {query:?}");
        assert_eq!(found[0].meta.id, flan.meta.id);
        assert_eq!(found[0].price.to_string(), "4200.00");
        assert_eq!(
            found[0].category.as_ref().map(|c| c.name.as_str()),
            Some("Postres")
        );
    }
}

#[tokio::test]
async fn search_matches_description_and_accented_stored_text() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_dish(
            DishCreate::new("Ñoquis", price("3100")).description("Con salsa de tomate y albahaca"),
        )
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Café cortado", price("900")))
        .await
        .unwrap();

    let by_name = engine
        .find_dishes(&DishFilter::default().search("noquis"))
        .await
        .unwrap();
    assert_eq!(names(&by_name), ["Ñoquis"]);

    let by_description = engine
        .find_dishes(&DishFilter::default().search("ALBAHACA"))
        .await
        .unwrap();
    assert_eq!(names(&by_description), ["Ñoquis"]);

    let cafe = engine
        .find_dishes(&DishFilter::default().search("cafe"))
        .await
        .unwrap();
    assert_eq!(names(&cafe), ["Café cortado"]);
}

#[tokio::test]
async fn search_wildcards_are_literal() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_dish(DishCreate::new("Tarta 100% cacao", price("800")))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Tarta de queso", price("700")))
        .await
        .unwrap();

    let found = engine
        .find_dishes(&DishFilter::default().search("100%"))
        .await
        .unwrap();
    assert_eq!(names(&found), ["Tarta 100% cacao"]);

    let none = engine
        .find_dishes(&DishFilter::default().search("tarta_"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn blank_search_is_ignored() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_dish(DishCreate::new("Flan", price("10")))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Asado", price("20")))
        .await
        .unwrap();

    let found = engine
        .find_dishes(&DishFilter::default().search("   "))
        .await
        .unwrap();
    assert_eq!(names(&found), ["Asado", "Flan"]);
}

#[tokio::test]
async fn duplicate_dish_name_is_rejected() {
    let (engine, db) = engine_with_db().await;

    engine
        .create_dish(DishCreate::new("Pizza Margherita", price("9500")))
        .await
        .unwrap();
    let err = engine
        .create_dish(DishCreate::new("Pizza Margherita", price("9900")))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Pizza Margherita".to_string()));
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let rows = dishes::Entity::find()
        .filter(dishes::Column::Name.eq("Pizza Margherita"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn rename_checks_uniqueness_excluding_self() {
    let (engine, _db) = engine_with_db().await;

    let flan = engine
        .create_dish(DishCreate::new("Flan", price("10")))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Asado", price("20")))
        .await
        .unwrap();

    let err = engine
        .update_dish(flan.meta.id, DishPatch::default().name("Asado"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let same = engine
        .update_dish(
            flan.meta.id,
            DishPatch::default().name("Flan").price(price("12.50")),
        )
        .await
        .unwrap();
    assert_eq!(same.name, "Flan");
    assert_eq!(same.price.cents(), 1250);
}

#[tokio::test]
async fn deleted_name_is_reusable_and_row_is_kept() {
    let (engine, db) = engine_with_db().await;
    let repo = Repository::<dishes::Entity>::new();

    let flan = engine
        .create_dish(DishCreate::new("Flan", price("10")))
        .await
        .unwrap();
    assert!(repo.exists_by_name(&db, "Flan", None).await.unwrap());

    engine.delete_dish(flan.meta.id).await.unwrap();
    assert!(!repo.exists_by_name(&db, "Flan", None).await.unwrap());

    let stored = dishes::Entity::find_by_id(flan.meta.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.deleted);
    assert!(stored.deleted_at.is_some());

    let again = engine
        .create_dish(DishCreate::new("Flan", price("11")))
        .await
        .unwrap();
    assert_ne!(again.meta.id, flan.meta.id);

    let err = engine.dish(flan.meta.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_missing_dish_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.delete_dish(999).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("dish 999".to_string()));

    let flan = engine
        .create_dish(DishCreate::new("Flan", price("10")))
        .await
        .unwrap();
    engine.delete_dish(flan.meta.id).await.unwrap();
    let twice = engine.delete_dish(flan.meta.id).await.unwrap_err();
    assert_eq!(twice.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn invalid_category_reference_is_rejected() {
    let (engine, db) = engine_with_db().await;

    let err = engine
        .create_dish(DishCreate::new("Flan", price("10")).category(42))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference(_)));

    let gone = engine.create_category("Viejos").await.unwrap();
    engine.delete_category(gone.meta.id).await.unwrap();
    let err = engine
        .create_dish(DishCreate::new("Flan", price("10")).category(gone.meta.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    assert_eq!(dishes::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_tag_rolls_back_the_whole_create() {
    let (engine, db) = engine_with_db().await;

    let vegan = engine.create_food_tag("Vegano").await.unwrap();
    let err = engine
        .create_dish(DishCreate::new("Ensalada", price("10")).tags(vec![vegan.meta.id, 77]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference(_)));
    assert_eq!(dishes::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn absent_tags_are_kept_and_empty_tags_clear() {
    let (engine, _db) = engine_with_db().await;

    let vegan = engine.create_food_tag("Vegano").await.unwrap();
    let gluten = engine.create_food_tag("Sin gluten").await.unwrap();
    let salad = engine
        .create_dish(
            DishCreate::new("Ensalada", price("10")).tags(vec![vegan.meta.id, gluten.meta.id]),
        )
        .await
        .unwrap();
    assert_eq!(salad.tag_ids(), [gluten.meta.id, vegan.meta.id]);

    let renamed = engine
        .update_dish(salad.meta.id, DishPatch::default().name("Ensalada verde"))
        .await
        .unwrap();
    assert_eq!(renamed.tags.len(), 2);

    let narrowed = engine
        .update_dish(salad.meta.id, DishPatch::default().tags(vec![vegan.meta.id]))
        .await
        .unwrap();
    assert_eq!(narrowed.tag_ids(), [vegan.meta.id]);

    let cleared = engine
        .update_dish(salad.meta.id, DishPatch::default().tags(Vec::new()))
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn tag_filter_lists_each_dish_once() {
    let (engine, _db) = engine_with_db().await;

    let vegan = engine.create_food_tag("Vegano").await.unwrap();
    let gluten = engine.create_food_tag("Sin gluten").await.unwrap();
    engine
        .create_dish(
            DishCreate::new("Ensalada", price("10"))
                .tags(vec![vegan.meta.id, gluten.meta.id, vegan.meta.id]),
        )
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Asado", price("20")))
        .await
        .unwrap();

    for tag in [vegan.meta.id, gluten.meta.id] {
        let found = engine
            .find_dishes(&DishFilter::default().tag(tag))
            .await
            .unwrap();
        assert_eq!(names(&found), ["Ensalada"]);
    }
}

#[tokio::test]
async fn deleted_tags_are_not_preloaded() {
    let (engine, _db) = engine_with_db().await;

    let vegan = engine.create_food_tag("Vegano").await.unwrap();
    let salad = engine
        .create_dish(DishCreate::new("Ensalada", price("10")).tags(vec![vegan.meta.id]))
        .await
        .unwrap();
    engine.delete_food_tag(vegan.meta.id).await.unwrap();

    let reloaded = engine.dish(salad.meta.id).await.unwrap();
    assert!(reloaded.tags.is_empty());
}

#[tokio::test]
async fn filters_are_intersected() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let vegan = engine.create_food_tag("Vegano").await.unwrap();
    engine
        .create_dish(
            DishCreate::new("Flan de coco", price("10"))
                .category(postres.meta.id)
                .tags(vec![vegan.meta.id]),
        )
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Flan casero", price("10")).category(postres.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Flan vegano suelto", price("10")).tags(vec![vegan.meta.id]))
        .await
        .unwrap();

    let filter = DishFilter::default()
        .search("flan")
        .category(postres.meta.id)
        .tag(vegan.meta.id);
    let found = engine.find_dishes(&filter).await.unwrap();
    assert_eq!(names(&found), ["Flan de coco"]);

    let in_category = engine
        .find_dishes(&DishFilter::default().category(postres.meta.id))
        .await
        .unwrap();
    assert_eq!(names(&in_category), ["Flan casero", "Flan de coco"]);
}

#[tokio::test]
async fn status_filter_hides_inactive_by_default() {
    let (engine, _db) = engine_with_db().await;

    let flan = engine
        .create_dish(DishCreate::new("Flan", price("10")))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Asado", price("20")))
        .await
        .unwrap();
    let toggled = engine.toggle_dish_active(flan.meta.id).await.unwrap();
    assert!(!toggled.meta.is_active);

    let default = engine.find_dishes(&DishFilter::default()).await.unwrap();
    assert_eq!(names(&default), ["Asado"]);

    let inactive = engine
        .find_dishes(&DishFilter::default().status(StatusFilter::Inactive))
        .await
        .unwrap();
    assert_eq!(names(&inactive), ["Flan"]);

    let all = engine
        .find_dishes(&DishFilter::default().status(StatusFilter::All))
        .await
        .unwrap();
    assert_eq!(names(&all), ["Asado", "Flan"]);

    let back = engine.toggle_dish_active(flan.meta.id).await.unwrap();
    assert!(back.meta.is_active);
    assert_eq!(engine.count_active_dishes().await.unwrap(), 2);
}

#[tokio::test]
async fn sections_group_by_active_category_then_uncategorized() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let entradas = engine.create_category("Entradas").await.unwrap();
    let empty = engine.create_category("Bebidas").await.unwrap();
    let hidden = engine.create_category("Fuera de carta").await.unwrap();
    engine
        .update_category(hidden.meta.id, engine::NamedPatch::default().active(false))
        .await
        .unwrap();

    engine
        .create_dish(DishCreate::new("Flan", price("10")).category(postres.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Empanada", price("10")).category(entradas.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Secreto", price("10")).category(hidden.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Pan", price("10")))
        .await
        .unwrap();

    let sections = engine.dish_sections(&DishFilter::default()).await.unwrap();
    assert_eq!(sections.len(), 3);
    match &sections[0] {
        DishSection::Category { category, dishes } => {
            assert_eq!(category.meta.id, entradas.meta.id);
            assert_eq!(names(dishes), ["Empanada"]);
        }
        other => panic!("unexpected section {other:?}"),
    }
    match &sections[1] {
        DishSection::Category { category, .. } => assert_eq!(category.name, "Postres"),
        other => panic!("unexpected section {other:?}"),
    }
    assert!(matches!(&sections[2], DishSection::Uncategorized { dishes } if names(dishes) == ["Pan"]));
    assert!(sections.iter().all(|section| match section {
        DishSection::Category { category, .. } => category.meta.id != empty.meta.id,
        DishSection::Uncategorized { .. } => true,
    }));
}

#[tokio::test]
async fn counts_ignore_deleted_dishes() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let flan = engine
        .create_dish(DishCreate::new("Flan", price("10")).category(postres.meta.id))
        .await
        .unwrap();
    engine
        .create_dish(DishCreate::new("Helado", price("10")).category(postres.meta.id))
        .await
        .unwrap();
    engine.delete_dish(flan.meta.id).await.unwrap();

    assert_eq!(engine.count_dishes().await.unwrap(), 1);
    assert_eq!(
        engine.count_dishes_in_category(postres.meta.id).await.unwrap(),
        1
    );
    let listed = engine.dishes_by_category(postres.meta.id).await.unwrap();
    assert_eq!(names(&listed), ["Helado"]);
    assert!(engine.dishes_without_category().await.unwrap().is_empty());
}

#[tokio::test]
async fn clearing_category_moves_dish_to_uncategorized() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let flan = engine
        .create_dish(
            DishCreate::new("Flan", price("10"))
                .category(postres.meta.id)
                .image("dishes/flan.jpg"),
        )
        .await
        .unwrap();
    assert_eq!(flan.image.as_deref(), Some("dishes/flan.jpg"));

    let moved = engine
        .update_dish(
            flan.meta.id,
            DishPatch::default().category(None).image(None),
        )
        .await
        .unwrap();
    assert_eq!(moved.category_id, None);
    assert!(moved.category.is_none());
    assert!(moved.image.is_none());
    assert_eq!(
        names(&engine.dishes_without_category().await.unwrap()),
        ["Flan"]
    );
}

#[tokio::test]
async fn blank_or_long_names_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let blank = engine
        .create_dish(DishCreate::new("   ", price("10")))
        .await
        .unwrap_err();
    assert!(matches!(blank, EngineError::InvalidName(_)));

    let long = "x".repeat(151);
    let err = engine
        .create_dish(DishCreate::new(long, price("10")))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let trimmed = engine
        .create_dish(DishCreate::new("  Flan  ", price("10")))
        .await
        .unwrap();
    assert_eq!(trimmed.name, "Flan");
}

#[tokio::test]
async fn update_touches_only_given_fields() {
    let (engine, _db) = engine_with_db().await;

    let postres = engine.create_category("Postres").await.unwrap();
    let flan = engine
        .create_dish(
            DishCreate::new("Flan", price("10"))
                .description("Con dulce de leche")
                .category(postres.meta.id),
        )
        .await
        .unwrap();

    let updated = engine
        .update_dish(flan.meta.id, DishPatch::default().price(price("12,50")))
        .await
        .unwrap();
    assert_eq!(updated.price.cents(), 1250);
    assert_eq!(updated.name, "Flan");
    assert_eq!(updated.description, "Con dulce de leche");
    assert_eq!(updated.category_id, Some(postres.meta.id));
    assert!(updated.meta.updated_at >= flan.meta.updated_at);

    let hidden = engine
        .update_dish(flan.meta.id, DishPatch::default().active(false))
        .await
        .unwrap();
    assert!(!hidden.meta.is_active);
    assert_eq!(hidden.price.cents(), 1250);
}
