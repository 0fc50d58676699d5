//! Request handler definitions
//!
//! Every route and its handler lives here. Handlers stay thin: they extract the request, call into one of the engine
//! APIs held in `web::Data`, and turn the result into JSON. Anything longer belongs in the engine.
//!
//! Handlers run on the actix worker threads, so they must never block. All I/O goes through async calls.
use actix_web::{get, web, HttpResponse, Responder};
use affiliate_engine::{
    traits::{
        CatalogManagement,
        CommissionManagement,
        LedgerDatabase,
        PaymentConfirmation,
        PaymentGateway,
        PayoutManagement,
        UserManagement,
    },
    AccountApi,
    CatalogApi,
    DashboardApi,
    NewRegistration,
    OrderFlowApi,
    PayoutApi,
    ReferralLink,
};
use log::*;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::ServerOptions,
    data_objects::{CreateOrderRequest, CreateOrderResponse, LoginRequest, TokenResponse, VerifyPaymentRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
//
// `impl A, B` gives the handler one type parameter per bound, in order. Adding `where combined` gives it a single
// type parameter that must satisfy every bound, for handlers whose APIs share one backend.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where combined)  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/auth/register" impl UserManagement);
/// Route handler for the sign-up endpoint
///
/// Expects a JSON body with `email`, `full_name`, `password` and an optional `referrer_id`. The referrer id is the
/// `referral_code` of an existing user, and is typically lifted from the `ref` query parameter of a referral link.
///
/// This route is unauthenticated.
pub async fn register<B: UserManagement>(
    body: web::Json<NewRegistration>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let registration = body.into_inner();
    debug!("💻️ Registration request for {}", registration.email);
    let user = api.register(registration).await.map_err(|e| {
        debug!("💻️ Registration failed. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(user))
}

route!(login => Post "/auth/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Checks the e-mail and password in the JSON body, and issues an access token if they match. The token must be
/// presented as a bearer token on every authenticated route. It is valid for a relatively short period and will NOT
/// refresh.
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { email, password } = body.into_inner();
    trace!("💻️ Received login request");
    let user = api.authenticate(&email, &password).await.map_err(|e| {
        debug!("💻️ Login failed. {e}");
        e
    })?;
    let access_token = signer.issue_token(JwtClaims::new(user.id, &user.email))?;
    trace!("💻️ Issued access token for user #{}", user.id);
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token, user)))
}

route!(me => Get "/auth/me" impl UserManagement);
pub async fn me<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET me for user #{}", claims.user_id);
    let user = api.fetch_active_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

route!(my_referral_link => Get "/auth/referral-link" impl UserManagement);
pub async fn my_referral_link<B: UserManagement>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET referral link for user #{}", claims.user_id);
    let user = api.fetch_active_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(ReferralLink::new(&options.frontend_url, user.id)))
}

//----------------------------------------------   Packages  ----------------------------------------------------
route!(packages => Get "/packages" impl CatalogManagement);
/// Lists the purchasable packages, cheapest first, with the GST and final prices filled in.
///
/// This route is unauthenticated.
pub async fn packages<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET packages");
    let packages = api.list_packages().await?;
    Ok(HttpResponse::Ok().json(packages))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(create_order => Post "/payments/create-order" impl LedgerDatabase, PaymentGateway);
/// Opens an order for the caller to buy a package.
///
/// The JSON body names the package tier. The response carries everything the checkout widget needs: the gateway's
/// order id, the amount in paise, the currency and the gateway's publishable key.
pub async fn create_order<B: LedgerDatabase, G: PaymentGateway>(
    claims: JwtClaims,
    body: web::Json<CreateOrderRequest>,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let tier = body.into_inner().package_tier;
    debug!("💻️ Create order request for the {tier} package from user #{}", claims.user_id);
    let user = accounts.fetch_active_user(claims.user_id).await?;
    let opened = api.open_order(user.id, tier).await.map_err(|e| {
        debug!("💻️ Could not open order. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(CreateOrderResponse::from(opened)))
}

route!(verify_payment => Post "/payments/verify-payment" impl LedgerDatabase, PaymentGateway);
/// Confirms payment for one of the caller's orders.
///
/// The JSON body holds the three values the checkout widget returns. If the signature checks out, the order is
/// completed, the package is granted and referral commissions are paid, all in one step. Confirming an order a second
/// time results in a `409 Conflict`. Orders that belong to someone else are reported as not found.
pub async fn verify_payment<B: LedgerDatabase, G: PaymentGateway>(
    claims: JwtClaims,
    body: web::Json<VerifyPaymentRequest>,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    let confirmation = PaymentConfirmation::from(body.into_inner());
    debug!("💻️ Verify payment request for {} from user #{}", confirmation.remote_order_id, claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let confirmed = api.confirm_order_for_user(claims.user_id, confirmation).await.map_err(|e| {
        debug!("💻️ Payment verification failed. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(confirmed))
}

route!(my_orders => Get "/payments/orders" impl LedgerDatabase, PaymentGateway);
pub async fn my_orders<B: LedgerDatabase, G: PaymentGateway>(
    claims: JwtClaims,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for user #{}", claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let orders = api.orders_for_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Dashboard  ----------------------------------------------------
route!(dashboard_stats => Get "/dashboard/stats" impl UserManagement, CommissionManagement where combined);
/// The caller's profile, earnings summary and referral counts, computed at read time.
pub async fn dashboard_stats<B: UserManagement + CommissionManagement>(
    claims: JwtClaims,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<DashboardApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET dashboard stats for user #{}", claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let stats = api.stats(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

route!(dashboard_commissions => Get "/dashboard/commissions" impl UserManagement, CommissionManagement where combined);
pub async fn dashboard_commissions<B: UserManagement + CommissionManagement>(
    claims: JwtClaims,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<DashboardApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET commission history for user #{}", claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let commissions = api.commissions(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(commissions))
}

route!(dashboard_referrals => Get "/dashboard/referrals" impl UserManagement, CommissionManagement where combined);
/// The caller's direct referrals and the referrals of those referrals.
pub async fn dashboard_referrals<B: UserManagement + CommissionManagement>(
    claims: JwtClaims,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<DashboardApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET referral network for user #{}", claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let network = api.referrals(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(network))
}

route!(my_payouts => Get "/dashboard/payouts" impl UserManagement, PayoutManagement where combined);
pub async fn my_payouts<B: UserManagement + PayoutManagement>(
    claims: JwtClaims,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<PayoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET payout history for user #{}", claims.user_id);
    accounts.fetch_active_user(claims.user_id).await?;
    let payouts = api.payouts_for_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(payouts))
}
