//! Cart selections frozen into orders and read back through the order schema.

use foundry::{
    cart::{Cart, CartItem},
    orders::{
        DownloadToken, EmailAddress, FieldErrorKind, NewOrder, OrderId, OrderItem, OrderStatus,
        check, validate,
    },
    pricing::format_minor,
};
use jiff::Timestamp;
use serde_json::json;
use testresult::TestResult;

fn license(font_id: &str, studio_slug: &str, price: u64) -> OrderItem {
    OrderItem {
        font_id: font_id.to_string(),
        typeface_name: "Grotesk".to_string(),
        typeface_slug: "grotesk".to_string(),
        studio_id: format!("{studio_slug}-id"),
        studio_slug: studio_slug.to_string(),
        font_name: font_id.to_string(),
        full_name: format!("Grotesk {font_id}"),
        price,
        sales_file_urls: vec![format!("https://files.example/{font_id}.zip")],
    }
}

fn draft(items: Vec<OrderItem>, total_cents: u64) -> TestResult<NewOrder> {
    Ok(NewOrder {
        id: OrderId::new("ord-1"),
        user_id: "user-1".to_string(),
        email: EmailAddress::parse("buyer@example.com")?,
        items,
        total_cents,
        status: OrderStatus::Pending,
        stripe_payment_intent_id: None,
        stripe_session_id: None,
        download_token: DownloadToken::new("tok-1"),
        created_at: None,
    })
}

#[test]
fn cart_total_becomes_order_total() -> TestResult {
    let lines = vec![
        license("regular", "north-type", 50_000),
        license("regular", "north-type", 1),
        license("regular", "south-type", 20_000),
        license("bold", "north-type", 29_999),
    ];

    let cart = Cart::with_items(lines.iter().map(OrderItem::cart_item));

    assert_eq!(cart.len(), 3, "repeated selection collapses");
    assert_eq!(cart.total(), Some(99_999));

    let items: Vec<OrderItem> = lines
        .into_iter()
        .filter(|line| line.price != 1)
        .collect();

    let order = draft(items, cart.total().ok_or("total overflowed")?)?;

    check(&order)?;

    assert_eq!(format_minor(order.total_cents, "USD")?, "$999.99");

    Ok(())
}

#[test]
fn stored_order_passes_the_schema_again() -> TestResult {
    let created_at: Timestamp = "2024-03-01T12:00:00Z".parse()?;
    let order = draft(vec![license("regular", "north-type", 4_999)], 4_999)?.into_order(created_at);

    let document = serde_json::to_value(&order)?;

    assert_eq!(document.get("status"), Some(&json!("pending")));
    assert!(document.get("stripeSessionId").is_none(), "unset references are omitted");

    let read_back = validate(&document)?;

    assert_eq!(read_back.into_order(Timestamp::UNIX_EPOCH), order);

    Ok(())
}

#[test]
fn candidate_with_several_problems_reports_each_one() -> TestResult {
    let candidate = json!({
        "id": "",
        "userId": "user-1",
        "email": "buyer@",
        "items": [{
            "fontId": "regular",
            "typefaceName": "Grotesk",
            "typefaceSlug": "grotesk",
            "studioId": "studio-1",
            "studioSlug": "north-type",
            "fontName": "Regular",
            "fullName": "Grotesk Regular",
            "price": -5,
            "salesFileUrls": []
        }],
        "totalCents": 10.5,
        "status": "refunded",
        "downloadToken": "tok-1"
    });

    let errors = validate(&candidate)
        .err()
        .ok_or("candidate must be rejected")?;

    assert_eq!(errors.get("id"), Some(&FieldErrorKind::Empty));
    assert_eq!(errors.get("email"), Some(&FieldErrorKind::InvalidEmail));
    assert_eq!(errors.get("items[0].price"), Some(&FieldErrorKind::Negative));
    assert_eq!(errors.get("totalCents"), Some(&FieldErrorKind::NotAnInteger));
    assert_eq!(errors.get("status"), Some(&FieldErrorKind::InvalidStatus));

    Ok(())
}

#[test]
fn cart_items_can_be_removed_by_key() {
    let regular = license("regular", "north-type", 50_000);
    let bold = license("bold", "north-type", 30_000);

    let mut cart = Cart::with_items([regular.cart_item(), bold.cart_item()]);

    let removed: Option<CartItem> = cart.remove_item(&regular.key());

    assert_eq!(removed.map(|item| item.price), Some(50_000));
    assert!(!cart.contains(&regular.key()));
    assert_eq!(cart.total(), Some(30_000));
}
