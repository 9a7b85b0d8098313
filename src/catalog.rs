use chrono::{Duration, Local, NaiveDate};

use crate::errors::CatalogError;
use crate::models::{Customer, HistoryEntry, InvoiceStatus, Product};

/// In-memory customers and products for the selector sheets. Presets are
/// always present; additions live until the app exits.
pub struct Catalog {
    customers: Vec<Customer>,
    products: Vec<Product>,
    next_custom_id: u32,
}

/// Text typed into the "add customer" form.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

/// Text typed into the "add product" form.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub description: String,
}

impl Catalog {
    pub fn with_presets() -> Self {
        Self {
            customers: preset_customers(),
            products: preset_products(),
            next_custom_id: 1,
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn add_customer(&mut self, form: &NewCustomer) -> Result<Customer, CatalogError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let customer = Customer {
            id: self.custom_id(),
            name: name.to_string(),
            email: non_blank(&form.email),
            phone: non_blank(&form.phone),
            company: non_blank(&form.company),
        };
        self.customers.push(customer.clone());
        Ok(customer)
    }

    pub fn add_product(&mut self, form: &NewProduct) -> Result<Product, CatalogError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(CatalogError::MissingName);
        }

        let price_text = form.price.trim();
        if price_text.is_empty() {
            return Err(CatalogError::MissingPrice);
        }
        let price = price_text
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
            .ok_or_else(|| CatalogError::InvalidPrice(price_text.to_string()))?;

        let product = Product {
            id: self.custom_id(),
            name: name.to_string(),
            price,
            description: non_blank(&form.description),
        };
        self.products.push(product.clone());
        Ok(product)
    }

    fn custom_id(&mut self) -> String {
        let id = format!("custom_{}", self.next_custom_id);
        self.next_custom_id += 1;
        id
    }
}

/// Presets carry short ids (`c1`, `p1`, ...); user additions are `custom_N`.
pub fn is_preset(id: &str) -> bool {
    !id.starts_with("custom_")
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn preset_customers() -> Vec<Customer> {
    let customer = |id: &str, name: &str, email: &str, phone: &str, company: &str| Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        company: Some(company.to_string()),
    };

    vec![
        customer("c1", "John Doe", "john@example.com", "+91 98765 43210", "Tech Corp"),
        customer("c2", "Jane Smith", "jane@startup.com", "+91 87654 32109", "Startup Inc"),
        customer("c3", "Bob Wilson", "bob@business.com", "+91 76543 21098", "Local Business"),
    ]
}

fn preset_products() -> Vec<Product> {
    let product = |id: &str, name: &str, price: f64, description: &str| Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: Some(description.to_string()),
    };

    vec![
        product("p1", "Website Design", 5000.0, "Custom website design"),
        product("p2", "Logo Design", 2000.0, "Brand logo creation"),
        product("p3", "Consultation", 1500.0, "1 hour consultation"),
    ]
}

/// Invoices shown in the history before anything is generated this session.
pub fn seed_history(today: NaiveDate) -> Vec<HistoryEntry> {
    let entry = |id: &str, customer: &str, amount: f64, status, days_ago: i64, items: &[&str]| {
        HistoryEntry {
            id: id.to_string(),
            customer: customer.to_string(),
            amount,
            status,
            date: today - Duration::days(days_ago),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    };

    vec![
        entry("INV-001", "John Doe", 1250.0, InvoiceStatus::Paid, 1, &["Web Design", "Logo Design"]),
        entry("INV-002", "Jane Smith", 750.0, InvoiceStatus::Pending, 2, &["Mobile App UI"]),
        entry("INV-003", "Tech Corp", 2100.0, InvoiceStatus::Overdue, 6, &["Website Development", "SEO Setup"]),
    ]
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_loaded() {
        let catalog = Catalog::with_presets();

        assert_eq!(catalog.customers().len(), 3);
        assert_eq!(catalog.products().len(), 3);
        assert!(catalog.customers().iter().all(|c| is_preset(&c.id)));
        assert_eq!(catalog.products()[0].price, 5000.0);
    }

    #[test]
    fn adding_a_customer_needs_only_a_name() {
        let mut catalog = Catalog::with_presets();

        let added = catalog
            .add_customer(&NewCustomer {
                name: "  Asha Rao ".to_string(),
                phone: " ".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(added.name, "Asha Rao");
        assert_eq!(added.phone, None);
        assert!(!is_preset(&added.id));
        assert_eq!(catalog.customers().last(), Some(&added));
    }

    #[test]
    fn nameless_customer_is_refused() {
        let mut catalog = Catalog::with_presets();

        let result = catalog.add_customer(&NewCustomer::default());

        assert_eq!(result, Err(CatalogError::MissingName));
        assert_eq!(catalog.customers().len(), 3);
    }

    #[test]
    fn product_price_must_be_a_number() {
        let mut catalog = Catalog::with_presets();
        let mut form = NewProduct {
            name: "Hosting".to_string(),
            ..Default::default()
        };

        assert_eq!(catalog.add_product(&form), Err(CatalogError::MissingPrice));

        form.price = "twelve".to_string();
        assert_eq!(
            catalog.add_product(&form),
            Err(CatalogError::InvalidPrice("twelve".to_string()))
        );

        form.price = "1200".to_string();
        let product = catalog.add_product(&form).unwrap();
        assert_eq!(product.price, 1200.0);
        assert_eq!(product.description, None);
    }

    #[test]
    fn custom_ids_are_unique() {
        let mut catalog = Catalog::with_presets();
        let first = catalog.add_customer(&NewCustomer { name: "A".into(), ..Default::default() }).unwrap();
        let second = catalog.add_product(&NewProduct { name: "B".into(), price: "1".into(), ..Default::default() }).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn seeded_history_is_dated_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let history = seed_history(today);

        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(history[2].status, InvoiceStatus::Overdue);
    }
}
