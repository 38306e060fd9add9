use super::*;

fn new_item() -> NewMenuItem {
    NewMenuItem {
        name: "  Empanada de carne ".into(),
        description: Some("   ".into()),
        category: "Entradas".into(),
        price_cents: 250,
        available: true,
        is_daily_special: false,
    }
}

fn stored_item() -> MenuItem {
    MenuItem {
        id: Uuid::new_v4(),
        name: "Flan".into(),
        description: Some("con dulce de leche".into()),
        category: "Postres".into(),
        price_cents: 400,
        available: true,
        is_daily_special: false,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

#[test]
fn validate_trims_and_drops_blank_description() {
    let item = new_item().validate().unwrap();
    assert_eq!(item.name, "Empanada de carne");
    assert_eq!(item.description, None);
    assert_eq!(item.price_cents, 250);
}

#[test]
fn validate_rejects_blank_name_and_category() {
    let mut item = new_item();
    item.name = " ".into();
    assert!(matches!(item.validate(), Err(MenuError::Validation(msg)) if msg.contains("name")));

    let mut item = new_item();
    item.category = String::new();
    assert!(matches!(item.validate(), Err(MenuError::Validation(msg)) if msg.contains("category")));
}

#[test]
fn validate_rejects_negative_price() {
    let mut item = new_item();
    item.price_cents = -1;
    assert!(matches!(item.validate(), Err(MenuError::Validation(_))));
}

#[test]
fn new_item_defaults_from_json() {
    let item: NewMenuItem =
        serde_json::from_str(r#"{"name":"Café","category":"Bebidas","price_cents":150}"#).unwrap();
    assert!(item.available);
    assert!(!item.is_daily_special);
}

#[test]
fn patch_toggles_daily_special_and_keeps_other_fields() {
    let mut item = stored_item();
    let patch = MenuItemPatch { is_daily_special: Some(true), ..MenuItemPatch::default() };
    patch.apply(&mut item).unwrap();
    assert!(item.is_daily_special);
    assert_eq!(item.name, "Flan");
    assert_eq!(item.description.as_deref(), Some("con dulce de leche"));
}

#[test]
fn patch_clears_description_with_blank_string() {
    let mut item = stored_item();
    let patch = MenuItemPatch { description: Some(String::new()), ..MenuItemPatch::default() };
    patch.apply(&mut item).unwrap();
    assert_eq!(item.description, None);
}

#[test]
fn patch_rejects_negative_price() {
    let mut item = stored_item();
    let patch = MenuItemPatch { price_cents: Some(-10), ..MenuItemPatch::default() };
    assert!(patch.apply(&mut item).is_err());
    assert_eq!(item.price_cents, 400);
}

#[test]
fn error_codes_and_classes() {
    let err = MenuError::NotFound(Uuid::nil());
    assert_eq!(err.error_code(), "E_MENU_ITEM_NOT_FOUND");
    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(MenuError::Validation("x".into()).class(), ErrorClass::Invalid);
}

#[tokio::test]
async fn load_snapshots_with_no_ids_skips_the_database() {
    let state = crate::state::test_helpers::test_app_state();
    let snapshots = load_snapshots(&state.pool, &[]).await.unwrap();
    assert!(snapshots.is_empty());
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn live_create_read_delete_round_trip() {
    let pool = crate::state::test_helpers::live_pool().await;
    let created = create_menu_item(&pool, new_item()).await.unwrap();
    let read = get_menu_item(&pool, created.id).await.unwrap();
    assert_eq!(read.name, "Empanada de carne");
    assert_eq!(read.price_cents, 250);

    delete_menu_item(&pool, created.id).await.unwrap();
    assert!(matches!(get_menu_item(&pool, created.id).await, Err(MenuError::NotFound(_))));
}
