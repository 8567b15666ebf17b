use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::config::ScreeningConfig;
use recruit_ai::workflows::screening::{
    CsvCandidateStore, FileSubmissionArchive, HttpFetcher, RemoteCandidateSource,
    ScreeningPipeline, ScreeningService, ScoringWeights, SubstitutionCipher,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type FileScreeningService =
    ScreeningService<CsvCandidateStore, HttpFetcher, FileSubmissionArchive>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the file-backed store and archive plus the HTTP remote source.
/// `offline` skips the remote source regardless of configuration.
pub(crate) fn build_screening_service(
    config: &ScreeningConfig,
    offline: bool,
) -> FileScreeningService {
    let remote = config
        .remote
        .clone()
        .filter(|_| !offline)
        .map(|remote| RemoteCandidateSource::new(remote, Arc::new(HttpFetcher)));

    info!(
        data_dir = %config.data_dir.display(),
        remote = remote.as_ref().map(|source| source.config().primary_url.as_str()).unwrap_or("disabled"),
        top_n = config.audit_top_n,
        "screening service configured"
    );

    ScreeningService::new(
        Arc::new(CsvCandidateStore::new(config.local_csv_path())),
        remote,
        Arc::new(FileSubmissionArchive::new(
            config.json_archive_path(),
            config.obfuscated_archive_path(),
            SubstitutionCipher::new(config.cipher_seed),
        )),
        ScreeningPipeline::new(ScoringWeights::STANDARD, config.audit_top_n),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_service_reads_only_the_local_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ScreeningConfig {
            data_dir: dir.path().to_path_buf(),
            ..ScreeningConfig::default()
        };

        let service = build_screening_service(&config, true);

        assert_eq!(service.next_id().expect("store readable").as_str(), "DS01");
        assert_eq!(service.pipeline().top_n(), config.audit_top_n);
    }
}
