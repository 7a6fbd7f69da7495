use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use shopkeep_customers::CreateCustomer;
use shopkeep_infra::repository::{
    CustomersRepository, InMemoryCustomersRepository, InMemoryOrdersRepository,
    InMemoryProductsRepository, ProductsRepository,
};
use shopkeep_infra::services::{CreateOrderRequest, CreateOrderService};
use shopkeep_orders::{RequestedProduct, plan_order};
use shopkeep_products::{CreateProduct, Product, ProductId};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

/// Pure placement check over an in-memory catalog of `lines` products.
fn bench_plan_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_order");

    for lines in [1usize, 10, 100] {
        let catalog: Vec<Product> = (0..lines)
            .map(|i| {
                Product::new(
                    ProductId::generate(),
                    CreateProduct::new(format!("product-{i}"), 1_000, 1_000_000),
                    chrono::Utc::now(),
                )
            })
            .collect();
        let requested: Vec<RequestedProduct> = catalog
            .iter()
            .map(|p| RequestedProduct::new(p.id, 1))
            .collect();

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| plan_order(black_box(&requested), black_box(&catalog)).expect("plan"))
        });
    }

    group.finish();
}

/// Full service call (lookups, plan, persist, stock write-back).
fn bench_create_order_service(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("create_order_service");

    for lines in [1usize, 10] {
        let orders = Arc::new(InMemoryOrdersRepository::new());
        let products = Arc::new(InMemoryProductsRepository::new());
        let customers = Arc::new(InMemoryCustomersRepository::new());

        let (customer, requested) = rt.block_on(async {
            let customer = customers
                .create(CreateCustomer::new("Bench", "bench@example.com"))
                .await
                .expect("customer");
            let mut requested = Vec::with_capacity(lines);
            for i in 0..lines {
                let p = products
                    .create(CreateProduct::new(format!("product-{i}"), 1_000, i64::MAX / 2))
                    .await
                    .expect("product");
                requested.push(RequestedProduct::new(p.id, 1));
            }
            (customer, requested)
        });

        let service = CreateOrderService::new(orders, products, customers);

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                rt.block_on(service.execute(CreateOrderRequest {
                    customer_id: customer.id,
                    products: requested.clone(),
                }))
                .expect("order")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan_order, bench_create_order_service);
criterion_main!(benches);
