//! Request handler definitions
//!
//! Define each route and its handler here. Every handler does a single store (or payment) call and returns the result
//! as JSON. Access control is not the handlers' concern: it is declared next to each route with a
//! [`Gate`](crate::middleware::Gate) and enforced before the handler runs. The one exception is cart ownership, which
//! can only be checked once the cart has been loaded.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O (database calls, calls to the payment processor) must be
//! awaited, never blocked on.
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use shop_engine::{
    db_types::{Cart, CartUpdate, NewCart, NewOrder, NewProduct, NewUser, OrderUpdate, ProductUpdate, UserProfile},
    CartApi,
    CartManagement,
    CatalogApi,
    OrderApi,
    OrderManagement,
    ProductManagement,
    UserApi,
    UserManagement,
};

use crate::{
    auth::{SessionClaims, TokenIssuer},
    credentials::CredentialCodec,
    data_objects::{
        LoginRequest,
        LoginResponse,
        NewestQuery,
        PaymentRequest,
        ProductsQuery,
        RegisterRequest,
        UserUpdateRequest,
    },
    errors::ServerError,
    integrations::stripe::PaymentProcessor,
    middleware::Gate,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bound:ty where gate $gate:expr) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::GateMiddlewareFactory::new($gate));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:ty) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
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
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Welcome to the storefront API\n")
}

fn nothing_to_update() -> ServerError {
    ServerError::InvalidRequestBody("The request does not change any fields".to_string())
}

//----------------------------------------------   Auth  ----------------------------------------------------

route!(register => Post "/auth/register" impl UserManagement);
/// Creates an account. The password is sealed before it reaches the store, and the stored record (sealed password
/// included) is returned.
pub async fn register<B: UserManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<UserApi<B>>,
    codec: web::Data<CredentialCodec>,
) -> Result<HttpResponse, ServerError> {
    let RegisterRequest { username, email, password } = body.into_inner();
    debug!("💻️ POST register for {username}");
    let sealed = codec.seal(&password)?;
    let user = api.register(NewUser::new(username, email, sealed)).await?;
    Ok(HttpResponse::Created().json(user))
}

route!(login => Post "/auth/login" impl UserManagement);
/// Exchanges a username and password for a session token.
///
/// An unknown username and a wrong password are reported separately, as 401 "Wrong username" and 401 "Wrong password".
pub async fn login<B: UserManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<UserApi<B>>,
    codec: web::Data<CredentialCodec>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { username, password } = body.into_inner();
    trace!("💻️ Received login request for {username}");
    let user = api.user_by_username(&username).await?.ok_or_else(|| {
        debug!("💻️ Login failed. No user called {username}");
        ServerError::WrongUsername
    })?;
    if !codec.matches(&user.password, &password) {
        debug!("💻️ Login failed. Wrong password for {username}");
        return Err(ServerError::WrongPassword);
    }
    let access_token = signer.issue(user.id, user.is_admin)?;
    info!("💻️ User #{} logged in", user.id);
    Ok(HttpResponse::Ok().json(LoginResponse { user: user.into(), access_token }))
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(update_user => Put "/users/{id}" impl UserManagement where gate Gate::self_or_admin("id"));
/// Only admins may change the admin flag, on anyone's account including their own.
pub async fn update_user<B: UserManagement>(
    claims: SessionClaims,
    path: web::Path<i64>,
    body: web::Json<UserUpdateRequest>,
    api: web::Data<UserApi<B>>,
    codec: web::Data<CredentialCodec>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let request = body.into_inner();
    debug!("💻️ PUT user #{id} by #{}", claims.id);
    if request.is_admin.is_some() && !claims.is_admin {
        info!("💻️ User #{} tried to change the admin flag of #{id}", claims.id);
        return Err(ServerError::InsufficientPermissions);
    }
    let sealed = request.password.as_deref().map(|p| codec.seal(p)).transpose()?;
    let update = request.into_update(sealed);
    if update.is_empty() {
        return Err(nothing_to_update());
    }
    let user = api
        .update(id, update)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("User #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

route!(delete_user => Delete "/users/{id}" impl UserManagement where gate Gate::self_or_admin("id"));
pub async fn delete_user<B: UserManagement>(
    path: web::Path<i64>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE user #{id}");
    if !api.delete(id).await? {
        return Err(ServerError::NoRecordFound(format!("User #{id} does not exist")));
    }
    Ok(HttpResponse::Ok().json("User has been deleted..."))
}

route!(find_user => Get "/users/find/{id}" impl UserManagement where gate Gate::admin());
pub async fn find_user<B: UserManagement>(
    path: web::Path<i64>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET user #{id}");
    let user = api
        .user_by_id(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("User #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

route!(users => Get "/users" impl UserManagement where gate Gate::admin());
/// All users, or with `?new=true`, only the most recent few.
pub async fn users<B: UserManagement>(
    query: web::Query<NewestQuery>,
    api: web::Data<UserApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let newest_only = query.newest_only();
    debug!("💻️ GET users (newest only: {newest_only})");
    let users = api.users(newest_only).await?.into_iter().map(UserProfile::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(users))
}

route!(user_stats => Get "/users/stats" impl UserManagement where gate Gate::admin());
pub async fn user_stats<B: UserManagement>(api: web::Data<UserApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET signup stats");
    let stats = api.signup_stats(Utc::now()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(add_product => Post "/products" impl ProductManagement where gate Gate::admin());
pub async fn add_product<B: ProductManagement>(
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = body.into_inner();
    debug!("💻️ POST product {}", product.title);
    let product = api.add(product).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product => Put "/products/{id}" impl ProductManagement where gate Gate::admin());
pub async fn update_product<B: ProductManagement>(
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PUT product #{id}");
    if update.is_empty() {
        return Err(nothing_to_update());
    }
    let product = api
        .update(id, update)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Product #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl ProductManagement where gate Gate::admin());
pub async fn delete_product<B: ProductManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE product #{id}");
    if !api.delete(id).await? {
        return Err(ServerError::NoRecordFound(format!("Product #{id} does not exist")));
    }
    Ok(HttpResponse::Ok().json("Product has been deleted..."))
}

route!(find_product => Get "/products/find/{id}" impl ProductManagement);
pub async fn find_product<B: ProductManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    trace!("💻️ GET product #{id}");
    let product = api
        .product(id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Product #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(product))
}

route!(products => Get "/products" impl ProductManagement);
/// `?new` returns only the newest product and takes precedence over `?category`.
pub async fn products<B: ProductManagement>(
    query: web::Query<ProductsQuery>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let newest = query.newest_only();
    trace!("💻️ GET products (newest: {newest}, category: {:?})", query.category);
    let products = api.products(newest, query.category).await?;
    Ok(HttpResponse::Ok().json(products))
}

//----------------------------------------------   Carts  ----------------------------------------------------
route!(create_cart => Post "/carts" impl CartManagement where gate Gate::authenticated());
pub async fn create_cart<B: CartManagement>(
    claims: SessionClaims,
    body: web::Json<NewCart>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let cart = body.into_inner();
    debug!("💻️ POST cart for user #{} by #{}", cart.user_id, claims.id);
    let cart = api.create(cart).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// Loads the cart and checks that the caller owns it or is an admin.
async fn owned_cart<B: CartManagement>(
    id: i64,
    claims: &SessionClaims,
    api: &CartApi<B>,
) -> Result<Cart, ServerError> {
    let cart =
        api.cart(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Cart #{id} does not exist")))?;
    if cart.user_id != claims.id && !claims.is_admin {
        info!("💻️ User #{} tried to modify cart #{id}, which belongs to #{}", claims.id, cart.user_id);
        return Err(ServerError::InsufficientPermissions);
    }
    Ok(cart)
}

route!(update_cart => Put "/carts/{id}" impl CartManagement where gate Gate::authenticated());
pub async fn update_cart<B: CartManagement>(
    claims: SessionClaims,
    path: web::Path<i64>,
    body: web::Json<CartUpdate>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PUT cart #{id} by #{}", claims.id);
    if update.is_empty() {
        return Err(nothing_to_update());
    }
    let cart = owned_cart(id, &claims, api.as_ref()).await?;
    // Only admins may hand a cart to another user
    if update.user_id.is_some_and(|u| u != cart.user_id) && !claims.is_admin {
        info!("💻️ User #{} tried to reassign cart #{id}", claims.id);
        return Err(ServerError::InsufficientPermissions);
    }
    let cart = api
        .update(id, update)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Cart #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(delete_cart => Delete "/carts/{id}" impl CartManagement where gate Gate::authenticated());
pub async fn delete_cart<B: CartManagement>(
    claims: SessionClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE cart #{id} by #{}", claims.id);
    owned_cart(id, &claims, api.as_ref()).await?;
    if !api.delete(id).await? {
        return Err(ServerError::NoRecordFound(format!("Cart #{id} does not exist")));
    }
    Ok(HttpResponse::Ok().json("Cart has been deleted..."))
}

route!(cart_for_user => Get "/carts/find/{userId}" impl CartManagement where gate Gate::self_or_admin("userId"));
pub async fn cart_for_user<B: CartManagement>(
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET cart for user #{user_id}");
    let cart = api
        .cart_for_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("User #{user_id} does not have a cart")))?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(carts => Get "/carts" impl CartManagement where gate Gate::admin());
pub async fn carts<B: CartManagement>(api: web::Data<CartApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all carts");
    let carts = api.carts().await?;
    Ok(HttpResponse::Ok().json(carts))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(place_order => Post "/orders" impl OrderManagement where gate Gate::authenticated());
pub async fn place_order<B: OrderManagement>(
    claims: SessionClaims,
    body: web::Json<NewOrder>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = body.into_inner();
    debug!("💻️ POST order for user #{} by #{}", order.user_id, claims.id);
    let order = api.place(order).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order => Put "/orders/{id}" impl OrderManagement where gate Gate::admin());
pub async fn update_order<B: OrderManagement>(
    path: web::Path<i64>,
    body: web::Json<OrderUpdate>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PUT order #{id}");
    if update.is_empty() {
        return Err(nothing_to_update());
    }
    let order = api
        .update(id, update)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order #{id} does not exist")))?;
    Ok(HttpResponse::Ok().json(order))
}

route!(delete_order => Delete "/orders/{id}" impl OrderManagement where gate Gate::admin());
pub async fn delete_order<B: OrderManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ DELETE order #{id}");
    if !api.delete(id).await? {
        return Err(ServerError::NoRecordFound(format!("Order #{id} does not exist")));
    }
    Ok(HttpResponse::Ok().json("Order has been deleted..."))
}

route!(orders_for_user => Get "/orders/find/{userId}" impl OrderManagement where gate Gate::self_or_admin("userId"));
pub async fn orders_for_user<B: OrderManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    debug!("💻️ GET orders for user #{user_id}");
    let orders = api.orders_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(orders => Get "/orders" impl OrderManagement where gate Gate::admin());
pub async fn orders<B: OrderManagement>(api: web::Data<OrderApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET all orders");
    let orders = api.orders().await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(income => Get "/orders/income" impl OrderManagement where gate Gate::admin());
pub async fn income<B: OrderManagement>(api: web::Data<OrderApi<B>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET monthly income");
    let income = api.income(Utc::now()).await?;
    Ok(HttpResponse::Ok().json(income))
}

//----------------------------------------------   Payment  ----------------------------------------------------
route!(payment => Post "/payment" impl PaymentProcessor);
/// Charges a card token collected by the client. The processor's receipt is returned verbatim.
pub async fn payment<P: PaymentProcessor>(
    body: web::Json<PaymentRequest>,
    processor: web::Data<P>,
) -> Result<HttpResponse, ServerError> {
    let PaymentRequest { token_id, amount } = body.into_inner();
    debug!("💻️ POST payment of {amount}");
    let receipt = processor.charge(&token_id, amount).await?;
    Ok(HttpResponse::Ok().json(receipt))
}
