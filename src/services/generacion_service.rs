//! Generación de repartos en lote
//!
//! La planificación es pura: a partir de la empresa, el repartidor y los
//! clientes elegidos produce el reparto y sus paradas sin tocar el
//! almacenamiento. El controlador persiste el plan completo de una vez.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    Cliente, Coordenada, Empresa, EstadoEnvio, EstadoParada, EstadoReparto, NuevaParada,
    NuevoEnvio, NuevoReparto, Repartidor,
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::sanitizar_opcional;

pub const MENSAJE_CAMPOS_REQUERIDOS: &str = "Por favor completa todos los campos requeridos";

/// Reparto listo para persistir
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReparto {
    pub reparto: NuevoReparto,
    pub paradas: Vec<NuevaParada>,
}

/// Punto desde el que sale cada tramo del recorrido
struct Tramo {
    direccion: String,
    coordenada: Option<Coordenada>,
}

/// Comprueba que la selección es utilizable y devuelve los clientes en el
/// orden en que fueron elegidos
pub fn validar_seleccion(
    empresa: &Empresa,
    repartidor: &Repartidor,
    seleccion: &[i64],
    encontrados: Vec<Cliente>,
) -> AppResult<Vec<Cliente>> {
    if seleccion.is_empty() {
        return Err(AppError::BadRequest(MENSAJE_CAMPOS_REQUERIDOS.to_string()));
    }

    let mut vistos = HashSet::with_capacity(seleccion.len());
    if let Some(repetido) = seleccion.iter().find(|id| !vistos.insert(**id)) {
        return Err(AppError::BadRequest(format!(
            "El cliente {} está seleccionado más de una vez",
            repetido
        )));
    }

    if !empresa.esta_activa() {
        return Err(AppError::BadRequest(format!(
            "La empresa {} no está activa",
            empresa.nombre
        )));
    }
    if !repartidor.esta_activo() {
        return Err(AppError::BadRequest(format!(
            "El repartidor {} no está activo",
            repartidor.nombre
        )));
    }

    let mut por_id: HashMap<i64, Cliente> = encontrados.into_iter().map(|c| (c.id, c)).collect();
    let mut ordenados = Vec::with_capacity(seleccion.len());
    for id in seleccion {
        let cliente = por_id
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Cliente {} no encontrado", id)))?;

        if cliente.empresa_id != Some(empresa.id) {
            return Err(AppError::BadRequest(format!(
                "El cliente {} no pertenece a la empresa {}",
                id, empresa.nombre
            )));
        }
        if !cliente.esta_activo() {
            return Err(AppError::BadRequest(format!("El cliente {} no está activo", id)));
        }
        ordenados.push(cliente);
    }

    Ok(ordenados)
}

/// Arma el reparto: parada de inicio en la empresa (orden 0) y una parada por
/// cliente en el orden recibido (órdenes 1..=N)
pub fn planificar_reparto(
    empresa: &Empresa,
    repartidor_id: i64,
    fecha: NaiveDate,
    clientes: &[Cliente],
    notas: Option<&str>,
) -> PlanReparto {
    let notas = sanitizar_opcional(notas).unwrap_or_else(|| {
        format!("Reparto generado automáticamente para {} clientes", clientes.len())
    });

    let reparto = NuevoReparto {
        fecha_reparto: fecha,
        repartidor_id,
        empresa_asociada_id: Some(empresa.id),
        estado: EstadoReparto::Planificado,
        notas: Some(notas),
    };

    let base = |origen: &Tramo, direccion_destino: String, destino: Option<Coordenada>| NuevoEnvio {
        direccion_origen: origen.direccion.clone(),
        origen: origen.coordenada,
        direccion_destino,
        destino,
        empresa_origen_id: Some(empresa.id),
        remitente_cliente_id: None,
        nombre_destinatario: None,
        telefono_destinatario: None,
        repartidor_asignado_id: Some(repartidor_id),
        precio: Decimal::ZERO,
        estado: EstadoEnvio::Asignado,
        fecha_estimada_entrega: Some(fecha),
        es_parada_inicio: false,
        detalles_adicionales: None,
    };

    let mut anterior = Tramo {
        direccion: empresa.direccion.clone(),
        coordenada: empresa.coordenada(),
    };

    let mut paradas = Vec::with_capacity(clientes.len() + 1);
    paradas.push(NuevaParada {
        orden_visita: 0,
        descripcion_parada: format!("Inicio de reparto - {}", empresa.nombre),
        estado_parada: EstadoParada::Asignado,
        envio: NuevoEnvio {
            es_parada_inicio: true,
            detalles_adicionales: Some(format!("Punto de partida - {}", empresa.nombre)),
            ..base(&anterior, empresa.direccion.clone(), empresa.coordenada())
        },
    });

    for (i, cliente) in clientes.iter().enumerate() {
        let nombre = cliente.nombre_completo();
        let envio = NuevoEnvio {
            nombre_destinatario: Some(nombre.clone()),
            telefono_destinatario: cliente.telefono.clone(),
            ..base(&anterior, cliente.direccion.clone(), cliente.coordenada())
        };

        paradas.push(NuevaParada {
            orden_visita: i as i32 + 1,
            descripcion_parada: format!("Entrega a {}", nombre),
            estado_parada: EstadoParada::Asignado,
            envio,
        });

        anterior = Tramo {
            direccion: cliente.direccion.clone(),
            coordenada: cliente.coordenada(),
        };
    }

    PlanReparto { reparto, paradas }
}

pub fn mensaje_exito(total_paradas: usize) -> String {
    let clientes = total_paradas.saturating_sub(1);
    format!(
        "Reparto generado exitosamente con {} paradas (1 inicio + {} clientes)",
        total_paradas, clientes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstadoGeneral;
    use chrono::Utc;

    fn empresa() -> Empresa {
        Empresa {
            id: 5,
            nombre: "Rumbo Central".to_string(),
            direccion: "Av. Corrientes 1000".to_string(),
            latitud: Some(-34.6037),
            longitud: Some(-58.3816),
            telefono: None,
            email: None,
            estado: EstadoGeneral::Activo,
            created_at: Utc::now(),
        }
    }

    fn repartidor() -> Repartidor {
        Repartidor {
            id: 2,
            nombre: "Luis".to_string(),
            apellido: None,
            user_auth_id: None,
            estado: EstadoGeneral::Activo,
            created_at: Utc::now(),
        }
    }

    fn cliente(id: i64, nombre: &str, direccion: &str) -> Cliente {
        Cliente {
            id,
            nombre: nombre.to_string(),
            apellido: "Pérez".to_string(),
            direccion: direccion.to_string(),
            latitud: Some(-34.6 - id as f64 / 1000.0),
            longitud: Some(-58.4),
            telefono: Some(format!("11-{}", id)),
            email: None,
            empresa_id: Some(5),
            estado: EstadoGeneral::Activo,
            created_at: Utc::now(),
        }
    }

    fn fecha() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn escenario_dos_clientes() {
        let clientes = vec![cliente(11, "Ana", "Calle 11"), cliente(12, "Beto", "Calle 12")];
        let plan = planificar_reparto(&empresa(), 2, fecha(), &clientes, None);

        assert_eq!(plan.reparto.estado, EstadoReparto::Planificado);
        assert_eq!(plan.reparto.repartidor_id, 2);
        assert_eq!(plan.reparto.empresa_asociada_id, Some(5));
        assert_eq!(
            plan.reparto.notas.as_deref(),
            Some("Reparto generado automáticamente para 2 clientes")
        );

        let ordenes: Vec<i32> = plan.paradas.iter().map(|p| p.orden_visita).collect();
        assert_eq!(ordenes, vec![0, 1, 2]);

        let inicio = &plan.paradas[0];
        assert!(inicio.envio.es_parada_inicio);
        assert_eq!(inicio.envio.direccion_destino, "Av. Corrientes 1000");
        assert_eq!(inicio.envio.direccion_origen, "Av. Corrientes 1000");
        assert_eq!(inicio.descripcion_parada, "Inicio de reparto - Rumbo Central");

        assert_eq!(plan.paradas[1].envio.direccion_destino, "Calle 11");
        assert_eq!(plan.paradas[2].envio.direccion_destino, "Calle 12");
        assert_eq!(plan.paradas[1].descripcion_parada, "Entrega a Ana Pérez");
        assert_eq!(plan.paradas[2].envio.nombre_destinatario.as_deref(), Some("Beto Pérez"));
    }

    #[test]
    fn origen_encadenado_con_la_parada_anterior() {
        let clientes = vec![cliente(11, "Ana", "Calle 11"), cliente(12, "Beto", "Calle 12")];
        let plan = planificar_reparto(&empresa(), 2, fecha(), &clientes, None);

        assert_eq!(plan.paradas[1].envio.direccion_origen, "Av. Corrientes 1000");
        assert_eq!(plan.paradas[2].envio.direccion_origen, "Calle 11");
        assert_eq!(plan.paradas[2].envio.origen, clientes[0].coordenada());
    }

    #[test]
    fn todas_las_paradas_asignadas_al_repartidor() {
        let clientes: Vec<Cliente> = (1..=5).map(|i| cliente(i, "C", "Calle")).collect();
        let plan = planificar_reparto(&empresa(), 2, fecha(), &clientes, Some("  urgente  "));

        assert_eq!(plan.paradas.len(), 6);
        assert_eq!(plan.reparto.notas.as_deref(), Some("urgente"));
        for parada in &plan.paradas {
            assert_eq!(parada.estado_parada, EstadoParada::Asignado);
            assert_eq!(parada.envio.estado, EstadoEnvio::Asignado);
            assert_eq!(parada.envio.repartidor_asignado_id, Some(2));
            assert_eq!(parada.envio.fecha_estimada_entrega, Some(fecha()));
        }
        assert_eq!(plan.paradas.iter().filter(|p| p.envio.es_parada_inicio).count(), 1);
    }

    #[test]
    fn seleccion_respeta_orden_elegido() {
        let encontrados = vec![cliente(11, "Ana", "Calle 11"), cliente(12, "Beto", "Calle 12")];
        let ordenados = validar_seleccion(&empresa(), &repartidor(), &[12, 11], encontrados).unwrap();
        assert_eq!(ordenados.iter().map(|c| c.id).collect::<Vec<_>>(), vec![12, 11]);
    }

    #[test]
    fn seleccion_invalida() {
        let e = empresa();
        let r = repartidor();

        assert!(matches!(validar_seleccion(&e, &r, &[], vec![]), Err(AppError::BadRequest(_))));
        assert!(matches!(
            validar_seleccion(&e, &r, &[11, 11], vec![cliente(11, "Ana", "Calle")]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validar_seleccion(&e, &r, &[11, 99], vec![cliente(11, "Ana", "Calle")]),
            Err(AppError::NotFound(_))
        ));

        let mut ajeno = cliente(13, "Caro", "Calle");
        ajeno.empresa_id = Some(6);
        assert!(matches!(
            validar_seleccion(&e, &r, &[13], vec![ajeno]),
            Err(AppError::BadRequest(_))
        ));

        let mut inactivo = repartidor();
        inactivo.estado = EstadoGeneral::Inactivo;
        assert!(validar_seleccion(&e, &inactivo, &[11], vec![cliente(11, "Ana", "Calle")]).is_err());
    }

    #[test]
    fn mensaje_cuenta_inicio_y_clientes() {
        assert_eq!(
            mensaje_exito(3),
            "Reparto generado exitosamente con 3 paradas (1 inicio + 2 clientes)"
        );
    }
}
