//! Test helpers.

use std::sync::Arc;

use foundry::orders::{
    DownloadToken, EmailAddress, NewOrder, Order, OrderId, OrderItem, OrderStatus,
};
use foundry_app::{
    context::AppContext,
    domain::{
        checkout::MockCheckoutService, downloads::MockDownloadsService,
        orders::MockOrdersService,
    },
    integrations::{MockMailingList, StripeWebhookVerifier, payments::DEFAULT_TOLERANCE_SECONDS},
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use testresult::TestResult;

use crate::{auth::ApiTokenDigest, state::State};

pub(crate) const TEST_API_TOKEN: &str = "service-token";

pub(crate) const TEST_WEBHOOK_SECRET: &str = "whsec_test";

/// Service mocks behind the handlers; anything without an expectation fails
/// the test when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) orders: MockOrdersService,
    pub(crate) downloads: MockDownloadsService,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) mailing_list: MockMailingList,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(
            AppContext {
                orders: Arc::new(self.orders),
                downloads: Arc::new(self.downloads),
                checkout: Arc::new(self.checkout),
                mailing_list: Arc::new(self.mailing_list),
                webhooks: StripeWebhookVerifier::new(
                    TEST_WEBHOOK_SECRET,
                    DEFAULT_TOLERANCE_SECONDS,
                ),
            },
            ApiTokenDigest::new(TEST_API_TOKEN),
            "USD".to_string(),
        )
    }

    /// Serve `route` with these mocks injected as state.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

pub(crate) fn make_item(font_id: &str, price: u64) -> OrderItem {
    OrderItem {
        font_id: font_id.to_string(),
        typeface_name: "Grotesk".to_string(),
        typeface_slug: "grotesk".to_string(),
        studio_id: "studio-1".to_string(),
        studio_slug: "north-type".to_string(),
        font_name: font_id.to_string(),
        full_name: format!("Grotesk {font_id}"),
        price,
        sales_file_urls: vec![format!("https://files.example/{font_id}.zip")],
    }
}

pub(crate) fn make_order(id: &str, status: OrderStatus) -> TestResult<Order> {
    Ok(NewOrder {
        id: OrderId::new(id),
        user_id: "user-1".to_string(),
        email: EmailAddress::parse("buyer@example.com")?,
        items: vec![make_item("regular", 4_999)],
        total_cents: 4_999,
        status,
        stripe_payment_intent_id: None,
        stripe_session_id: None,
        download_token: DownloadToken::new("tok-1"),
        created_at: None,
    }
    .into_order(Timestamp::UNIX_EPOCH))
}
