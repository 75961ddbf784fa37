pub struct NotificationTemplates;

impl NotificationTemplates {
    pub const SENSOR_ALERT_SUBJECT: &'static str = "Alerta de Sensores FarmTech";
    pub const TEST_ALERT_MESSAGE: &'static str = "🔔 Alerta de teste enviado pela API FarmTech";

    /// Plain-text body for a sensor alert: one line per finding under a header.
    pub fn sensor_alert(campo_nome: &str, leitura_timestamp: &str, findings: &[String]) -> String {
        let generated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let mut body = format!(
            "Alerta gerado em {} para o campo '{}' (leitura de {}):",
            generated_at, campo_nome, leitura_timestamp
        );
        for finding in findings {
            body.push('\n');
            body.push_str(finding);
        }
        body
    }

    pub fn low_moisture(umidade: f64) -> String {
        format!(
            "Umidade baixa ({:.1}%), recomenda-se acionar a irrigação.",
            umidade
        )
    }

    pub fn ph_out_of_range(ph: f64) -> String {
        format!(
            "pH fora da faixa ideal ({:.2}). É necessário corrigir a acidez.",
            ph
        )
    }
}
