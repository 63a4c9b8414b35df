use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use shop_engine::{CartApi, CatalogApi, OrderApi, SqliteDatabase, UserApi};

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    credentials::CredentialCodec,
    errors::ServerError,
    integrations::stripe::StripeClient,
    routes::{
        health,
        index,
        AddProductRoute,
        CartForUserRoute,
        CartsRoute,
        CreateCartRoute,
        DeleteCartRoute,
        DeleteOrderRoute,
        DeleteProductRoute,
        DeleteUserRoute,
        FindProductRoute,
        FindUserRoute,
        IncomeRoute,
        LoginRoute,
        OrdersForUserRoute,
        OrdersRoute,
        PaymentRoute,
        PlaceOrderRoute,
        ProductsRoute,
        RegisterRoute,
        UpdateCartRoute,
        UpdateOrderRoute,
        UpdateProductRoute,
        UpdateUserRoute,
        UserStatsRoute,
        UsersRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    info!("🗃️ Database is ready at {}", db.url());
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(ServerError::from)
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let payments = StripeClient::new(config.stripe.clone())?;
    let srv = HttpServer::new(move || {
        let users_api = UserApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let carts_api = CartApi::new(db.clone());
        let orders_api = OrderApi::new(db.clone());
        let signer = TokenIssuer::new(&config.auth);
        let codec = CredentialCodec::new(config.auth.password_secret.clone(), config.auth.password_scheme);
        let api_scope = web::scope("/api")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(UserStatsRoute::<SqliteDatabase>::new())
            .service(FindUserRoute::<SqliteDatabase>::new())
            .service(UsersRoute::<SqliteDatabase>::new())
            .service(UpdateUserRoute::<SqliteDatabase>::new())
            .service(DeleteUserRoute::<SqliteDatabase>::new())
            .service(FindProductRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(AddProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase>::new())
            .service(CartForUserRoute::<SqliteDatabase>::new())
            .service(CartsRoute::<SqliteDatabase>::new())
            .service(CreateCartRoute::<SqliteDatabase>::new())
            .service(UpdateCartRoute::<SqliteDatabase>::new())
            .service(DeleteCartRoute::<SqliteDatabase>::new())
            .service(IncomeRoute::<SqliteDatabase>::new())
            .service(OrdersForUserRoute::<SqliteDatabase>::new())
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(PlaceOrderRoute::<SqliteDatabase>::new())
            .service(UpdateOrderRoute::<SqliteDatabase>::new())
            .service(DeleteOrderRoute::<SqliteDatabase>::new())
            .service(PaymentRoute::<StripeClient>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("shop::access_log"))
            .app_data(web::Data::new(users_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(carts_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(signer))
            .app_data(web::Data::new(codec))
            .app_data(web::Data::new(payments.clone()))
            .service(health)
            .service(index)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
