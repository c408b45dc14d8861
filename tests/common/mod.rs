#![allow(dead_code)]

use chrono::NaiveDate;
use pagos::domain::pago::{EstadoPago, Pago};
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub fn pago(id: &str, estado: EstadoPago, empresa: &str, fecha: &str) -> Pago {
    Pago {
        id: id.to_string(),
        fecha: NaiveDate::parse_from_str(fecha, "%Y-%m-%d").unwrap(),
        empresa: empresa.to_string(),
        area_operacion: None,
        rubro: None,
        tercero: format!("Tercero {id}"),
        valor_operacion: Decimal::from(100_000),
        estado_pago: estado,
        ingreso_o_gasto: None,
        forma_pago: Some("TRANSFERENCIA".to_string()),
        tiene_presupuesto: None,
        factura_url: None,
        soporte_url: None,
        trazabilidad: vec![],
    }
}

/// The two records used throughout the filtering examples, as the server returns them.
pub fn server_pagos() -> Value {
    json!([
        {
            "id": "P-0001",
            "fecha": "2025-01-16",
            "empresa": "Bavaria",
            "tercero": "Estación Norte",
            "valorOperacion": 1250000,
            "estadoPago": "PENDIENTE"
        },
        {
            "id": "P-0002",
            "fecha": "2025-04-04",
            "empresa": "SESPA",
            "tercero": "Clínica Sur",
            "valorOperacion": 340000,
            "estadoPago": "PAGADO",
            "trazabilidad": [
                {"usuario": "mockUser", "fecha": "2025-04-04T10:00:00Z", "nota": "Creado"}
            ]
        }
    ])
}
