//! Demo catalog records.

use rust_decimal::Decimal;

use voltshop_core::ProductId;

use crate::models::{Category, Product};

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    price: i64,
    original_price: Option<i64>,
    discount_percent: Option<i64>,
    image: &'static str,
    brand: &'static str,
    category: Category,
    is_new: bool,
    is_promotion: bool,
    max_quantity: Option<u32>,
}

impl Seed {
    fn to_product(&self) -> Product {
        let cents = |c: i64| Decimal::new(c, 2);
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            price: cents(self.price),
            original_price: self.original_price.map(cents),
            discount_percent: self.discount_percent.map(Decimal::from),
            image: self.image.to_owned(),
            brand: self.brand.to_owned(),
            category: self.category,
            is_new: self.is_new,
            is_promotion: self.is_promotion,
            max_quantity: self.max_quantity,
        }
    }
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "smart-tv-oled-55",
        name: "Smart TV OLED 55\"",
        description: "Smart TV OLED 4K de 55 polegadas com WebOS e ThinQ AI.",
        price: 399_990,
        original_price: Some(499_990),
        discount_percent: None,
        image: "/placeholder-product.jpg",
        brand: "LG",
        category: Category::Tvs,
        is_new: false,
        is_promotion: true,
        max_quantity: Some(3),
    },
    Seed {
        id: "galaxy-s23",
        name: "Smartphone Galaxy S23",
        description: "Snapdragon 8 Gen 2, 8GB RAM, 256GB.",
        price: 499_990,
        original_price: Some(599_990),
        discount_percent: None,
        image: "/smartphone-s23.jpg",
        brand: "Samsung",
        category: Category::Smartphones,
        is_new: false,
        is_promotion: true,
        max_quantity: Some(5),
    },
    Seed {
        id: "starlink",
        name: "Adaptador Starlink Ethernet V2",
        description: "Adaptador Ethernet para o sistema Starlink de 2ª geração.",
        price: 24_999,
        original_price: Some(30_000),
        discount_percent: None,
        image: "/images/products/starlink-adapter.png",
        brand: "Genérico",
        category: Category::Electronics,
        is_new: false,
        is_promotion: true,
        max_quantity: Some(10),
    },
    Seed {
        id: "carrinho-off-road",
        name: "Carrinho de controle remoto off-road 4x4 MN82",
        description: "",
        price: 0,
        original_price: None,
        discount_percent: None,
        image: "/images/products/carrinho-off-road.png",
        brand: "MN82",
        category: Category::Toys,
        is_new: false,
        is_promotion: false,
        max_quantity: Some(10),
    },
    Seed {
        id: "macbook-pro-m2-14",
        name: "MacBook Pro M2 14\"",
        description: "Apple M2 Pro, 16GB RAM, 512GB SSD, Tela Liquid Retina XDR.",
        price: 1_499_900,
        original_price: None,
        discount_percent: None,
        image: "/images/products/macbook-pro.jpg",
        brand: "Apple",
        category: Category::Notebooks,
        is_new: true,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "dell-xps-13-plus",
        name: "Dell XPS 13 Plus",
        description: "Intel Core i7 12ª Geração, 16GB RAM, 1TB SSD, Windows 11 Pro.",
        price: 899_900,
        original_price: Some(1_049_900),
        discount_percent: None,
        image: "/images/products/dell-xps.jpg",
        brand: "Dell",
        category: Category::Notebooks,
        is_new: false,
        is_promotion: true,
        max_quantity: None,
    },
    Seed {
        id: "dell-xps-15",
        name: "Dell XPS 15",
        description: "Notebook premium com tela InfinityEdge de 15 polegadas.",
        price: 1_199_990,
        original_price: None,
        discount_percent: Some(15),
        image: "/images/products/dell-xps-15.jpg",
        brand: "Dell",
        category: Category::Notebooks,
        is_new: false,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "ipad-pro-12-9",
        name: "iPad Pro 12.9\"",
        description: "Chip M2 e tela Liquid Retina XDR de 12,9 polegadas.",
        price: 949_990,
        original_price: None,
        discount_percent: Some(10),
        image: "/images/products/ipad-pro.jpg",
        brand: "Apple",
        category: Category::Tablets,
        is_new: false,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "iphone-14-pro-max",
        name: "iPhone 14 Pro Max",
        description: "256GB, Câmera Tripla de 48MP, Tela Super Retina XDR de 6.7\".",
        price: 799_999,
        original_price: Some(899_999),
        discount_percent: None,
        image: "/images/products/iphone-14.jpg",
        brand: "Apple",
        category: Category::Smartphones,
        is_new: true,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "nokia-105",
        name: "Nokia 105",
        description: "Teclado físico e bateria de longa duração, ideal para uso básico.",
        price: 14_999,
        original_price: Some(19_999),
        discount_percent: None,
        image: "/images/products/nokia-105.jpg",
        brand: "Nokia",
        category: Category::Smartphones,
        is_new: false,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "sony-wh-1000xm5",
        name: "Sony WH-1000XM5",
        description: "Fone over-ear com cancelamento de ruído.",
        price: 249_990,
        original_price: None,
        discount_percent: Some(10),
        image: "/images/products/sony-wh1000xm5.jpg",
        brand: "Sony",
        category: Category::Audio,
        is_new: false,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "sony-alpha-a7-iv",
        name: "Sony Alpha A7 IV",
        description: "Câmera mirrorless full-frame de 33MP, gravação 4K 60p, estabilização de 5 eixos.",
        price: 1_599_999,
        original_price: Some(1_799_999),
        discount_percent: None,
        image: "/images/products/sony-a7iv.jpg",
        brand: "Sony",
        category: Category::Photography,
        is_new: true,
        is_promotion: false,
        max_quantity: None,
    },
    Seed {
        id: "canon-rf-24-70",
        name: "Canon RF 24-70mm f/2.8L",
        description: "Lente zoom profissional para câmeras Canon RF, abertura f/2.8 constante.",
        price: 1_249_999,
        original_price: Some(1_399_999),
        discount_percent: None,
        image: "/images/products/canon-rf2470.jpg",
        brand: "Canon",
        category: Category::Photography,
        is_new: false,
        is_promotion: false,
        max_quantity: None,
    },
];

pub(super) fn products() -> Vec<Product> {
    SEEDS.iter().map(Seed::to_product).collect()
}
