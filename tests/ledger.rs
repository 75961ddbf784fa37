//! Field registry and reading ledger against a local store.

use chrono::NaiveDateTime;
use farmtech_server::error::AppError;
use farmtech_server::services::campos::{self, NovoCampo};
use farmtech_server::services::sensores::{self, NovaLeitura, PontoSerie, TIMESTAMP_FORMAT};
use farmtech_server::storage::Connector;
use tempfile::TempDir;

fn local_connector(tmp: &TempDir) -> Connector {
    Connector::new(None, "require", tmp.path().join("farm.db"))
}

fn novo_campo(nome: &str, largura: f64, comprimento: f64) -> NovoCampo {
    NovoCampo {
        nome: nome.to_string(),
        cultura: "soja".to_string(),
        largura,
        comprimento,
    }
}

fn nova_leitura(campo_id: i32, umidade: f64) -> NovaLeitura {
    NovaLeitura {
        campo_id,
        umidade,
        ph: 6.4,
        nutrientes: 1.2,
        temperatura: Some(23.5),
    }
}

#[tokio::test]
async fn area_is_product_of_dimensions() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);

    for (largura, comprimento) in [(10.0, 20.0), (0.1, 0.3), (123.456, 78.9)] {
        let campo = campos::create(&connector, novo_campo("Talhão", largura, comprimento))
            .await
            .unwrap();
        assert_eq!(campo.area_m2, largura * comprimento);
        assert_eq!(campo.largura, largura);
        assert_eq!(campo.comprimento, comprimento);
    }
}

#[tokio::test]
async fn fields_are_listed_newest_first() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);

    for nome in ["Norte", "Sul", "Leste", "Oeste"] {
        campos::create(&connector, novo_campo(nome, 1.0, 2.0))
            .await
            .unwrap();
    }

    let listed = campos::list(&connector).await.unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].nome, "Oeste");
    assert!(listed.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn readings_get_non_decreasing_iso_timestamps() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);
    let campo = campos::create(&connector, novo_campo("Norte", 10.0, 10.0))
        .await
        .unwrap();

    let mut previous: Option<String> = None;
    for umidade in [40.0, 38.5, 35.0, 31.2, 28.9] {
        let leitura = sensores::record(&connector, nova_leitura(campo.id, umidade))
            .await
            .unwrap();
        assert!(NaiveDateTime::parse_from_str(&leitura.timestamp, TIMESTAMP_FORMAT).is_ok());
        if let Some(prev) = &previous {
            assert!(leitura.timestamp >= *prev);
        }
        assert_eq!(leitura.campo_id, campo.id);
        assert_eq!(leitura.umidade, umidade);
        assert_eq!(leitura.temperatura, Some(23.5));
        previous = Some(leitura.timestamp);
    }
}

#[tokio::test]
async fn orphan_readings_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);

    let err = sensores::record(&connector, nova_leitura(42, 50.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let campo = campos::create(&connector, novo_campo("Norte", 1.0, 1.0))
        .await
        .unwrap();
    assert!(sensores::latest(&connector, campo.id, 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn latest_is_bounded_filtered_and_descending() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);
    let norte = campos::create(&connector, novo_campo("Norte", 1.0, 1.0)).await.unwrap();
    let sul = campos::create(&connector, novo_campo("Sul", 1.0, 1.0)).await.unwrap();

    for i in 0..6 {
        sensores::record(&connector, nova_leitura(norte.id, 50.0 - i as f64))
            .await
            .unwrap();
        sensores::record(&connector, nova_leitura(sul.id, 70.0))
            .await
            .unwrap();
    }

    let latest = sensores::latest(&connector, norte.id, 4).await.unwrap();
    assert_eq!(latest.len(), 4);
    assert!(latest.iter().all(|l| l.campo_id == norte.id));
    assert!(latest.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    // The most recent reading was the driest one.
    assert_eq!(latest[0].umidade, 45.0);

    let all = sensores::latest(&connector, norte.id, 100).await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn series_is_latest_in_chronological_order() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);
    let campo = campos::create(&connector, novo_campo("Norte", 1.0, 1.0)).await.unwrap();

    for umidade in [60.0, 55.0, 50.0, 45.0, 40.0] {
        sensores::record(&connector, nova_leitura(campo.id, umidade))
            .await
            .unwrap();
    }

    let latest = sensores::latest(&connector, campo.id, 3).await.unwrap();
    let serie = sensores::series(&connector, campo.id, 3).await.unwrap();

    assert_eq!(serie.campo_id, campo.id);
    let expected: Vec<PontoSerie> = latest.into_iter().rev().map(PontoSerie::from).collect();
    assert_eq!(serie.pontos, expected);
    let umidades: Vec<f64> = serie.pontos.iter().map(|p| p.umidade).collect();
    assert_eq!(umidades, vec![50.0, 45.0, 40.0]);
}

#[tokio::test]
async fn insumos_follow_field_crop_and_area() {
    let tmp = TempDir::new().unwrap();
    let connector = local_connector(&tmp);
    let campo = campos::create(&connector, novo_campo("Norte", 50.0, 100.0)).await.unwrap();

    let estimate = campos::insumos(&connector, campo.id).await.unwrap();
    assert_eq!(estimate.area_m2, 5000.0);
    assert_eq!(estimate.estimativa.mudas, 150_000.0);

    assert!(matches!(
        campos::insumos(&connector, campo.id + 100).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readings_keep_timestamps_in_insertion_order() {
    let tmp = TempDir::new().unwrap();
    let connector = std::sync::Arc::new(local_connector(&tmp));
    let campo = campos::create(&connector, novo_campo("Norte", 1.0, 1.0))
        .await
        .unwrap();
    let campo_id = campo.id;

    for round in 0..5 {
        let writers: Vec<_> = (0..16)
            .map(|i| {
                let connector = connector.clone();
                tokio::spawn(async move {
                    let umidade = f64::from(round * 16 + i) % 100.0;
                    sensores::record(&connector, nova_leitura(campo_id, umidade)).await
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }
    }

    let mut rows = sensores::latest(&connector, campo_id, 1000).await.unwrap();
    assert_eq!(rows.len(), 80);
    rows.sort_by_key(|l| l.id);
    for pair in rows.windows(2) {
        assert!(
            pair[0].timestamp <= pair[1].timestamp,
            "reading {} at {} precedes reading {} at {}",
            pair[0].id,
            pair[0].timestamp,
            pair[1].id,
            pair[1].timestamp
        );
    }
}
