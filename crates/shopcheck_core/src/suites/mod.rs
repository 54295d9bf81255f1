//! The five domain suites and the request helpers they share.

mod auth;
mod cart;
mod categories;
mod orders;
mod products;

use crate::case::{CaseContext, TestCase};
use crate::check::Check;
use crate::client::ApiResponse;
use crate::error::Result;
use crate::fixtures::UserPayload;
use serde_json::{json, Value};

/// Well-formed identifier that no entity ever has.
pub const NONEXISTENT_ID: &str = "605d5b1d9c3e1a001f7b8b1a";

/// Every case of every suite, in declaration order.
pub fn all_cases() -> Vec<TestCase> {
    let mut cases = auth::cases();
    cases.extend(categories::cases());
    cases.extend(products::cases());
    cases.extend(cart::cases());
    cases.extend(orders::cases());
    cases
}

/// Register `user`, log in, and return the issued token.
pub(crate) fn register_and_login(
    ctx: &mut CaseContext<'_>,
    label: &str,
    user: &UserPayload,
) -> Result<String> {
    let res = ctx.api().post("/auth/register").json(user).send()?;
    ctx.verify(&format!("{label}: register"), &res, Check::status(201).success())?;

    let res = ctx.api().post("/auth/login").json(&user.credentials()).send()?;
    ctx.verify(
        &format!("{label}: login"),
        &res,
        Check::status(200).present("/data/token"),
    )?;
    res.text_at("/data/token")
}

/// Create a category as `token` and return its id.
pub(crate) fn create_category(
    ctx: &mut CaseContext<'_>,
    label: &str,
    token: &str,
    name: &str,
) -> Result<String> {
    let res = ctx
        .api()
        .post("/categories")
        .bearer(token)
        .json(&json!({ "name": name }))
        .send()?;
    ctx.verify(label, &res, Check::status(201).present("/data/_id"))?;
    res.text_at("/data/_id")
}

/// Create a product as `token` and return the full response.
pub(crate) fn create_product(
    ctx: &mut CaseContext<'_>,
    label: &str,
    token: &str,
    product: &Value,
) -> Result<ApiResponse> {
    let res = ctx.api().post("/products").bearer(token).json(product).send()?;
    ctx.verify(label, &res, Check::status(201).present("/data/_id"))?;
    Ok(res)
}

/// Delete `path` as `token`, expecting 200.
pub(crate) fn delete_ok(ctx: &mut CaseContext<'_>, label: &str, token: &str, path: &str) -> Result<()> {
    let res = ctx.api().delete(path).bearer(token).send()?;
    ctx.verify(label, &res, Check::status(200).success())
}

/// Product body with the fields the create route requires.
pub(crate) fn product_body(name: &str, price: f64, sku: &str, stock: u64, category_id: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "sku": sku,
        "stock": stock,
        "categoryId": category_id,
    })
}
