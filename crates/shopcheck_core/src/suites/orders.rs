//! Checkout from a customer cart, post-order state, and the owner-only
//! order routes.

use super::{create_category, create_product, delete_ok, product_body, register_and_login, NONEXISTENT_ID};
use crate::case::{CaseContext, Position, Suite, TestCase};
use crate::check::Check;
use crate::error::Result;
use crate::fixtures::{FixtureKey, UserPayload};
use serde_json::{json, Value};

const PRICE: f64 = 20.00;
const STOCK: u64 = 10;
const ORDERED: u64 = 3;

const POST_ORDER: Position = Position::new(46);
const CUSTOMER_READS: Position = Position::new(47);
const OWNER_ROUTES: Position = Position::new(48);
const CLEANUP: Position = Position::new(50);

fn address() -> Value {
    json!({ "street": "123 Test St", "city": "Cairo", "country": "Egypt" })
}

fn owner(ctx: &CaseContext<'_>) -> Result<String> {
    ctx.text(FixtureKey::OwnerToken)
}

fn customer(ctx: &CaseContext<'_>) -> Result<String> {
    ctx.text(FixtureKey::OrderCustomerToken)
}

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Orders, Position::new(41), "setup product")
            .setup()
            .reads(&[FixtureKey::OwnerToken])
            .writes(&[
                FixtureKey::OrderCategoryId,
                FixtureKey::OrderProductId,
                FixtureKey::OrderProductSlug,
                FixtureKey::OrderProductStock,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let category_name = ctx.identity().name("Order Test Cat");
                let category = create_category(ctx, "Order setup: category (201)", &token, &category_name)?;
                ctx.set(FixtureKey::OrderCategoryId, category.as_str())?;

                let body = product_body(
                    &ctx.identity().name("Order Test Product"),
                    PRICE,
                    &ctx.identity().sku("ORDER-TEST"),
                    STOCK,
                    &category,
                );
                let res = create_product(ctx, "Order setup: product (201)", &token, &body)?;
                ctx.set(FixtureKey::OrderProductId, res.text_at("/data/_id")?)?;
                ctx.set(FixtureKey::OrderProductSlug, res.text_at("/data/slug")?)?;
                ctx.set(FixtureKey::OrderProductStock, STOCK)?;
                ctx.note("Order tests created a temporary product and category.");
                Ok(())
            }),
        TestCase::new(Suite::Orders, Position::new(42), "setup customer")
            .setup()
            .writes(&[FixtureKey::OrderCustomerToken])
            .body(|ctx| {
                let user = UserPayload::new(
                    ctx.identity().email("order-customer"),
                    ctx.identity().password(),
                    "Order",
                    "Customer",
                );
                let token = register_and_login(ctx, "Order setup: customer", &user)?;
                ctx.set(FixtureKey::OrderCustomerToken, token)?;
                ctx.note("Order tests created a temporary customer.");
                Ok(())
            }),
        TestCase::new(Suite::Orders, Position::new(43), "customer adds to cart")
            .reads(&[FixtureKey::OrderCustomerToken, FixtureKey::OrderProductId])
            .body(|ctx| {
                let token = customer(ctx)?;
                let product = ctx.text(FixtureKey::OrderProductId)?;
                let res = ctx
                    .api()
                    .post("/cart/items")
                    .bearer(&token)
                    .json(&json!({ "productId": product, "quantity": ORDERED }))
                    .send()?;
                ctx.verify(
                    "Cart: customer adds items (200)",
                    &res,
                    Check::status(200)
                        .len("/data/items", 1)
                        .equals("/data/items/0/quantity", ORDERED),
                )
            }),
        TestCase::new(Suite::Orders, Position::new(44), "create validation")
            .reads(&[FixtureKey::OrderCustomerToken])
            .body(|ctx| {
                let token = customer(ctx)?;

                let res = ctx.api().post("/orders").bearer(&token).json(&json!({})).send()?;
                ctx.verify(
                    "Create: missing shipping address (400)",
                    &res,
                    Check::status(400)
                        .error_code("VALIDATION_ERROR")
                        .message_contains("Shipping address is required"),
                )?;

                let bad_address = json!({ "shippingAddress": { "city": "Cairo", "country": "Egypt" } });
                let res = ctx.api().post("/orders").bearer(&token).json(&bad_address).send()?;
                ctx.verify(
                    "Create: missing street (400)",
                    &res,
                    Check::status(400).message_contains("Street is required"),
                )
            }),
        TestCase::new(Suite::Orders, Position::new(45), "create")
            .reads(&[FixtureKey::OrderCustomerToken])
            .writes(&[FixtureKey::OrderId])
            .body(|ctx| {
                let token = customer(ctx)?;
                let res = ctx
                    .api()
                    .post("/orders")
                    .bearer(&token)
                    .json(&json!({ "shippingAddress": address() }))
                    .send()?;
                ctx.verify(
                    "Create: Happy Path (201)",
                    &res,
                    Check::status(201)
                        .equals("/data/status", "Pending")
                        .equals("/data/items/0/quantity", ORDERED)
                        .equals("/data/shippingAddress/city", "Cairo"),
                )?;
                ctx.set(FixtureKey::OrderId, res.text_at("/data/_id")?)
            }),
        TestCase::new(Suite::Orders, POST_ORDER, "cart cleared")
            .reads(&[FixtureKey::OrderCustomerToken])
            .body(|ctx| {
                let token = customer(ctx)?;
                let res = ctx.api().get("/cart").bearer(&token).send()?;
                ctx.verify(
                    "After order: cart is cleared",
                    &res,
                    Check::status(200).len("/data/items", 0).amount("/data/subtotal", 0.0),
                )
            }),
        TestCase::new(Suite::Orders, POST_ORDER, "stock reduced")
            .reads(&[FixtureKey::OrderProductSlug, FixtureKey::OrderProductStock])
            .body(|ctx| {
                let slug = ctx.text(FixtureKey::OrderProductSlug)?;
                let expected = ctx.count(FixtureKey::OrderProductStock)?.saturating_sub(ORDERED);
                let res = ctx.api().get(&format!("/products/{slug}")).send()?;
                ctx.verify(
                    "After order: stock is reduced",
                    &res,
                    Check::status(200).equals("/data/stock", expected),
                )
            }),
        TestCase::new(Suite::Orders, POST_ORDER, "reorder with empty cart")
            .reads(&[FixtureKey::OrderCustomerToken])
            .body(|ctx| {
                let token = customer(ctx)?;
                let res = ctx
                    .api()
                    .post("/orders")
                    .bearer(&token)
                    .json(&json!({ "shippingAddress": address() }))
                    .send()?;
                ctx.verify(
                    "After order: second order fails (400)",
                    &res,
                    Check::status(400).error_code("CART_EMPTY"),
                )
            }),
        TestCase::new(Suite::Orders, CUSTOMER_READS, "my orders")
            .reads(&[FixtureKey::OrderCustomerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = customer(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;
                let res = ctx.api().get("/orders/my").bearer(&token).send()?;
                ctx.verify(
                    "Customer: my orders (200)",
                    &res,
                    Check::status(200).equals("/count", 1).equals("/data/0/_id", order),
                )
            }),
        TestCase::new(Suite::Orders, CUSTOMER_READS, "own order by id")
            .reads(&[FixtureKey::OrderCustomerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = customer(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;
                let res = ctx.api().get(&format!("/orders/{order}")).bearer(&token).send()?;
                ctx.verify(
                    "Customer: order by id (200)",
                    &res,
                    Check::status(200).equals("/data/_id", order.as_str()),
                )
            }),
        TestCase::new(Suite::Orders, CUSTOMER_READS, "unknown order")
            .reads(&[FixtureKey::OrderCustomerToken])
            .body(|ctx| {
                let token = customer(ctx)?;
                let res = ctx
                    .api()
                    .get(&format!("/orders/{NONEXISTENT_ID}"))
                    .bearer(&token)
                    .send()?;
                ctx.verify(
                    "Customer: unknown order (404)",
                    &res,
                    Check::status(404).error_code("NOT_FOUND"),
                )
            }),
        TestCase::new(Suite::Orders, OWNER_ROUTES, "owner lists orders")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = ctx.api().get("/orders").bearer(&token).send()?;
                ctx.verify(
                    "Admin: all orders (200)",
                    &res,
                    Check::status(200).at_least("/count", 1.0),
                )
            }),
        TestCase::new(Suite::Orders, OWNER_ROUTES, "owner reads customer order")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;
                let res = ctx.api().get(&format!("/orders/{order}")).bearer(&token).send()?;
                ctx.verify(
                    "Admin: customer order by id (200)",
                    &res,
                    Check::status(200).equals("/data/_id", order.as_str()),
                )
            }),
        TestCase::new(Suite::Orders, OWNER_ROUTES, "invalid status")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;
                let res = ctx
                    .api()
                    .patch(&format!("/orders/{order}/status"))
                    .bearer(&token)
                    .json(&json!({ "status": "InvalidStatus" }))
                    .send()?;
                ctx.verify(
                    "Admin: invalid status (400)",
                    &res,
                    Check::status(400).error_code("VALIDATION_ERROR"),
                )
            }),
        TestCase::new(Suite::Orders, OWNER_ROUTES, "ship order")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;
                let res = ctx
                    .api()
                    .patch(&format!("/orders/{order}/status"))
                    .bearer(&token)
                    .json(&json!({ "status": "Shipped" }))
                    .send()?;
                ctx.verify(
                    "Admin: mark shipped (200)",
                    &res,
                    Check::status(200)
                        .equals("/data/status", "Shipped")
                        .present("/data/shippedAt"),
                )
            }),
        TestCase::new(Suite::Orders, Position::new(49), "customer on owner routes")
            .reads(&[FixtureKey::OrderCustomerToken, FixtureKey::OrderId])
            .body(|ctx| {
                let token = customer(ctx)?;
                let order = ctx.text(FixtureKey::OrderId)?;

                let res = ctx.api().get("/orders").bearer(&token).send()?;
                ctx.verify(
                    "Security: customer lists all orders (403)",
                    &res,
                    Check::status(403).error_code("FORBIDDEN"),
                )?;

                let res = ctx
                    .api()
                    .patch(&format!("/orders/{order}/status"))
                    .bearer(&token)
                    .json(&json!({ "status": "Delivered" }))
                    .send()?;
                ctx.verify(
                    "Security: customer updates status (403)",
                    &res,
                    Check::status(403).error_code("FORBIDDEN"),
                )
            }),
        TestCase::new(Suite::Orders, CLEANUP, "delete product")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::OrderProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/products/{}", ctx.text(FixtureKey::OrderProductId)?);
                delete_ok(ctx, "Cleanup: order product", &token, &path)
            }),
        TestCase::new(Suite::Orders, CLEANUP, "delete category")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::OrderCategoryId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/categories/{}", ctx.text(FixtureKey::OrderCategoryId)?);
                delete_ok(ctx, "Cleanup: order category", &token, &path)?;
                ctx.note("Order tests cleaned up temporary product and category.");
                Ok(())
            }),
    ]
}
