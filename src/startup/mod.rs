//! One-time bootstrap run before the server accepts requests.
//!
//! Creates the data, upload, and public directories, seeds the first
//! admin credential when no users exist, and seeds the initial product
//! catalog when no products file exists yet. Never runs in the request
//! path and never overwrites existing data.

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::api::auth::hash_password;
use crate::config::Config;
use crate::store::{Collection, JsonStore, Product, User};
use crate::uploads::PRODUCT_SUBDIR;

pub async fn bootstrap(config: &Config, store: &JsonStore) -> Result<()> {
    for dir in [
        config.storage.data_dir.clone(),
        config.storage.upload_dir.clone(),
        config.storage.upload_dir.join(PRODUCT_SUBDIR),
        config.storage.public_dir.clone(),
    ] {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    seed_admin_user(config, store).await?;
    seed_products(store).await?;
    Ok(())
}

async fn seed_admin_user(config: &Config, store: &JsonStore) -> Result<()> {
    let users: Vec<User> = store.load(Collection::Users).await;
    if !users.is_empty() {
        return Ok(());
    }

    let password_hash = hash_password(&config.auth.admin_password)
        .map_err(|e| anyhow!("Failed to hash admin password: {e}"))?;
    let users = vec![User {
        id: "user-1".to_string(),
        username: config.auth.admin_username.clone(),
        password_hash,
        role: "admin".to_string(),
    }];
    store.save(Collection::Users, &users).await?;

    warn!(
        username = %config.auth.admin_username,
        "Seeded initial admin user; change the password after first login"
    );
    Ok(())
}

async fn seed_products(store: &JsonStore) -> Result<()> {
    if store.collection_path(Collection::Products).exists() {
        return Ok(());
    }

    let products = initial_products();
    let count = products.len();
    store.save(Collection::Products, &products).await?;

    info!(count, "Seeded initial product catalog");
    Ok(())
}

fn initial_products() -> Vec<Product> {
    vec![
        Product {
            id: "bizcochos-grasa".into(),
            name: "Bizcochos de Grasa Artesanales (250g)".into(),
            short_description: "Ideales para el mate. Crujientes y sabrosos. 🧉".into(),
            long_description: "Bizcochos de grasa hechos con grasa real. El clásico argentino, compañero perfecto del mate.".into(),
            ingredients: vec![
                "Harina".into(),
                "Grasa vacuna".into(),
                "Agua".into(),
                "Sal".into(),
            ],
            price: 1600.0,
            discount: 0,
            featured: true,
            img_url: "https://lh3.googleusercontent.com/d/1qw9GvE2kyXOzy_dYNIzUK0pJcOOW-57q".into(),
            quiz_score: vec![1, 2],
        },
        Product {
            id: "chipa-cuarto-kg".into(),
            name: "Chipá Artesanal (250g)".into(),
            short_description: "Crujiente por fuera, tierno por dentro. Sin TACC. 🧀".into(),
            long_description: "El clásico chipá, al estilo D'Pan, explotado de queso. Perfecto para celíacos.".into(),
            ingredients: vec![
                "Almidón de mandioca".into(),
                "Queso estacionado".into(),
                "Huevo".into(),
                "Leche".into(),
            ],
            price: 1800.0,
            discount: 0,
            featured: true,
            img_url: "https://lh3.googleusercontent.com/d/1OnWYIXYqR4jVuKocJFnERXDgqmsHgaYm".into(),
            quiz_score: vec![2, 3],
        },
        Product {
            id: "pan-campo".into(),
            name: "Pan de Campo Rústico".into(),
            short_description: "Corteza gruesa y crujiente, miga elástica y sabor intenso. 🥖".into(),
            long_description: "Nuestro pan estrella. Elaborado con levadura natural y un proceso de leudado tradicional, lo que le otorga un sabor rústico inigualable.".into(),
            ingredients: vec![
                "Harina de trigo".into(),
                "Levadura".into(),
                "Agua".into(),
                "Sal marina".into(),
            ],
            price: 2500.0,
            discount: 0,
            featured: true,
            img_url: "https://lh3.googleusercontent.com/d/1daJchnkrpaTVsO0LTJLi-v-jXKwcSynl".into(),
            quiz_score: vec![5, 6],
        },
        Product {
            id: "pan-integral-lactal".into(),
            name: "Pan Integral Lactal (100% Granos)".into(),
            short_description: "Máximo aporte de fibra. Un pan denso y nutritivo. 🌾".into(),
            long_description: "Pan 100% integral. Utilizamos granos enteros y semillas para garantizar la máxima fibra y nutrientes. Ideal para tostadas fitness.".into(),
            ingredients: vec![
                "Harina de trigo 100% integral".into(),
                "Semillas variadas".into(),
                "Agua".into(),
                "Miel de caña".into(),
            ],
            price: 2300.0,
            discount: 0,
            featured: true,
            img_url: "https://lh3.googleusercontent.com/d/1GOT2aDt9yWQrIXqpV0HKjg90WFUKTDa9".into(),
            quiz_score: vec![7, 8, 9],
        },
    ]
}
