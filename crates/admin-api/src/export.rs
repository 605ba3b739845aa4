//! 주문 CSV 내보내기.
//!
//! 주문마다 요약 행 하나, 항목마다 상세 행 하나를 씁니다. 요약 행의 상품 열과
//! 상세 행의 고객 열은 빈 값으로 채워 열 위치를 맞춥니다.

use std::path::Path;

use admin_core::{AdminError, OrderWithItems};

/// CSV 헤더.
pub const EXPORT_HEADER: [&str; 6] = ["ID", "Name", "Email", "Product Title", "Price", "Quantity"];

/// 다운로드 파일 이름.
pub const EXPORT_FILE_NAME: &str = "orders.csv";

/// 주문 목록을 CSV 바이트로 렌더링.
pub fn render_orders_csv(orders: &[OrderWithItems]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADER)?;

    for entry in orders {
        let order = &entry.order;
        wtr.write_record([
            order.id.to_string().as_str(),
            order.customer_name().as_str(),
            order.email.as_str(),
            "",
            "",
            "",
        ])?;

        for item in &entry.items {
            wtr.write_record([
                "",
                "",
                "",
                item.product_title.as_str(),
                item.price.to_string().as_str(),
                item.quantity.to_string().as_str(),
            ])?;
        }
    }

    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

/// 렌더링한 CSV를 내보내기 경로에 저장합니다. 상위 디렉토리가 없으면 만듭니다.
pub async fn write_export(path: &Path, bytes: &[u8]) -> Result<(), AdminError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_core::{Order, OrderItem};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn order(id: i64, first: &str, last: &str, items: Vec<OrderItem>) -> OrderWithItems {
        OrderWithItems {
            order: Order {
                id,
                firstname: first.to_string(),
                lastname: last.to_string(),
                email: format!("{}@example.com", first.to_lowercase()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            items,
        }
    }

    fn item(order_id: i64, title: &str, price: rust_decimal::Decimal, quantity: i32) -> OrderItem {
        OrderItem {
            id: 0,
            order_id,
            product_title: title.to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_rows_layout() {
        let orders = vec![
            order(
                1,
                "Ada",
                "Lovelace",
                vec![item(1, "Notebook", dec!(12.50), 2), item(1, "Pen", dec!(1.99), 10)],
            ),
            order(2, "Alan", "Turing", vec![]),
        ];

        let csv = String::from_utf8(render_orders_csv(&orders).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "ID,Name,Email,Product Title,Price,Quantity",
                "1,Ada Lovelace,ada@example.com,,,",
                ",,,Notebook,12.50,2",
                ",,,Pen,1.99,10",
                "2,Alan Turing,alan@example.com,,,",
            ]
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = String::from_utf8(render_orders_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.trim_end(), "ID,Name,Email,Product Title,Price,Quantity");
    }

    #[test]
    fn test_titles_with_commas_are_quoted() {
        let orders = vec![order(3, "Grace", "Hopper", vec![item(3, "Cable, USB-C", dec!(5), 1)])];
        let csv = String::from_utf8(render_orders_csv(&orders).unwrap()).unwrap();
        assert!(csv.contains(r#","Cable, USB-C",5,1"#));
    }

    #[tokio::test]
    async fn test_write_export_creates_parent() {
        let dir = std::env::temp_dir().join(format!("admin-export-{}", std::process::id()));
        let path = dir.join("nested").join(EXPORT_FILE_NAME);

        write_export(&path, b"ID\n").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"ID\n");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
