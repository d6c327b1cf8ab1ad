use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cart;
mod cart_handlers;
mod config;
mod error;
mod locations;
mod map_handlers;
mod models;
mod sessions;
mod sim_handlers;
mod simulation;
mod user_handlers;
mod users;

use crate::cart::CartStore;
use crate::config::Config;
use crate::locations::LocationCatalog;
use crate::sessions::SessionStore;
use crate::users::UserStore;

#[get("/")]
async fn index() -> impl Responder {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Datacenter Ecology Map API</title>
        <style>
            body {
                background-color: #0b1a12;
                color: #9fe8c0;
                font-family: monospace;
                padding: 40px;
            }
            h1 {
                color: #4cd98a;
            }
            ul {
                list-style-type: square;
            }
            li {
                margin-bottom: 10px;
            }
            code {
                background: #122b1d;
                padding: 2px 6px;
                border-radius: 4px;
                color: #9fe8c0;
            }
        </style>
    </head>
    <body>
        <h1>Datacenter Ecology Map API</h1>
        <p>Welcome to the API hub. Here are the available endpoints:</p>
        <ul>
            <li><code>GET /</code> – This help page</li>
            <li><code>GET /health</code> – Health check (returns OK)</li>
            <li><code>POST /register</code> – Create an account</li>
            <li><code>POST /login</code> – Log in, receive a session cookie</li>
            <li><code>GET /profile</code> – Protected profile data</li>
            <li><code>POST /logout</code> – End the session</li>
            <li><code>GET /alldatacenters</code> – Existing data centers</li>
            <li><code>GET /api/possible-datacenters</code> – Candidate site coordinates</li>
            <li><code>GET /api/property-details?lat=&amp;lng=</code> – Candidate site details</li>
            <li><code>GET /api/cart?username=</code> – View a cart</li>
            <li><code>POST /api/cart/add</code> – Buy a site into the cart</li>
            <li><code>POST /api/cart/remove</code> – Remove a cart item by index</li>
            <li><code>DELETE /api/cart?username=</code> – Delete a cart</li>
            <li><code>GET /api/simulation?username=</code> – Climate projection for a cart</li>
        </ul>
    </body>
    </html>
    "#;

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

/// Simple health check
#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let addr = format!("0.0.0.0:{}", config.port);

    let users = web::Data::new(UserStore::load(&config.users_file).map_err(std::io::Error::other)?);
    let sessions = web::Data::new(SessionStore::new());
    let catalog = web::Data::new(LocationCatalog::new(
        &config.datacenters_file,
        &config.candidates_file,
    ));
    let carts = web::Data::new(CartStore::load(&config.cart_dir).map_err(std::io::Error::other)?);

    info!(%addr, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(users.clone())
            .app_data(sessions.clone())
            .app_data(catalog.clone())
            .app_data(carts.clone())
            .service(index)
            .service(health)
            .service(user_handlers::register)
            .service(user_handlers::login)
            .service(user_handlers::profile)
            .service(user_handlers::logout)
            .service(map_handlers::all_datacenters)
            .service(map_handlers::possible_datacenters)
            .service(map_handlers::property_details)
            .service(cart_handlers::view_cart)
            .service(cart_handlers::add_to_cart)
            .service(cart_handlers::remove_from_cart)
            .service(cart_handlers::clear_cart)
            .service(sim_handlers::simulate)
    })
    .bind(addr)?
    .run()
    .await
}
