use crate::domain::pago::{EstadoPago, IngresoOGasto, Pago, Trazabilidad};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn creado(y: i32, m: u32, d: u32) -> Vec<Trazabilidad> {
    vec![Trazabilidad {
        usuario: "mockUser".to_string(),
        fecha: Utc
            .with_ymd_and_hms(y, m, d, 9, 0, 0)
            .single()
            .unwrap_or_default(),
        nota: "Creado".to_string(),
    }]
}

/// Fixed dataset published when the remote collection cannot be read.
pub fn sample_pagos() -> Vec<Pago> {
    vec![
        Pago {
            id: "P-0001".to_string(),
            fecha: fecha(2025, 1, 16),
            empresa: "Bavaria".to_string(),
            area_operacion: Some("LOGÍSTICA".to_string()),
            rubro: Some("COMBUSTIBLES".to_string()),
            tercero: "Estación Terpel Norte".to_string(),
            valor_operacion: dec!(1250000),
            estado_pago: EstadoPago::Pendiente,
            ingreso_o_gasto: Some(IngresoOGasto::Gasto),
            forma_pago: Some("TRANSFERENCIA".to_string()),
            tiene_presupuesto: Some(true),
            factura_url: Some("factura-0001.pdf".to_string()),
            soporte_url: None,
            trazabilidad: creado(2025, 1, 16),
        },
        Pago {
            id: "P-0002".to_string(),
            fecha: fecha(2025, 4, 4),
            empresa: "SESPA".to_string(),
            area_operacion: Some("ADMINISTRACIÓN".to_string()),
            rubro: Some("TECNOLOGÍA".to_string()),
            tercero: "Soluciones Cloud SAS".to_string(),
            valor_operacion: dec!(3400000),
            estado_pago: EstadoPago::Pagado,
            ingreso_o_gasto: Some(IngresoOGasto::Gasto),
            forma_pago: Some("TARJETA".to_string()),
            tiene_presupuesto: Some(true),
            factura_url: None,
            soporte_url: None,
            trazabilidad: creado(2025, 4, 4),
        },
        Pago {
            id: "P-0003".to_string(),
            fecha: fecha(2025, 2, 20),
            empresa: "Ecopetrol".to_string(),
            area_operacion: Some("OPERACIONES".to_string()),
            rubro: Some("MANTENIMIENTO".to_string()),
            tercero: "Talleres del Valle".to_string(),
            valor_operacion: dec!(890000),
            estado_pago: EstadoPago::Autorizado,
            ingreso_o_gasto: Some(IngresoOGasto::Gasto),
            forma_pago: Some("CHEQUE".to_string()),
            tiene_presupuesto: Some(false),
            factura_url: None,
            soporte_url: Some("soporte-0003.png".to_string()),
            trazabilidad: creado(2025, 2, 20),
        },
        Pago {
            id: "P-0004".to_string(),
            fecha: fecha(2025, 3, 11),
            empresa: "Bavaria".to_string(),
            area_operacion: Some("VENTAS".to_string()),
            rubro: Some("PUBLICIDAD".to_string()),
            tercero: "Medios Creativos Ltda".to_string(),
            valor_operacion: dec!(2100000),
            estado_pago: EstadoPago::Autorizado,
            ingreso_o_gasto: Some(IngresoOGasto::Ingreso),
            forma_pago: Some("EFECTIVO".to_string()),
            tiene_presupuesto: None,
            factura_url: None,
            soporte_url: None,
            trazabilidad: creado(2025, 3, 11),
        },
    ]
}
