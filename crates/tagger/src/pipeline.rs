//! 파이프라인 오케스트레이션 -- 라인 분류와 집계의 전체 흐름을 관리합니다.
//!
//! # 내부 흐름
//! ```text
//! lines -> RecordClassifier (LookupTable) -> Aggregator -> PipelineReport
//!               |
//!          ParseError -> skipped_count + warn!
//! ```
//!
//! 라인 단위 형식 오류는 실행을 멈추지 않습니다. 소스를 열거나 읽을 수 없는
//! 경우에만 [`TaggerError`]로 전체 실행이 중단됩니다.
//!
//! 워커가 2개 이상이면 입력을 연속 구간으로 나눠 워커별 [`Aggregator`]에
//! 집계한 뒤 합칩니다. 결과는 순차 실행과 같습니다.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use flowtag_core::error::ParseError;
use flowtag_core::metrics as m;

use crate::aggregator::{Aggregator, CountSnapshot};
use crate::classifier::{RecordClassifier, UNTAGGED};
use crate::config::TaggerConfig;
use crate::error::TaggerError;
use crate::lookup::LookupTable;

/// 한 번의 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// 정렬된 집계 결과
    pub counts: CountSnapshot,
    /// 처리 대상 라인 수 (무시된 빈 라인 제외)
    pub total_lines: u64,
    /// 분류에 성공한 라인 수
    pub classified_count: u64,
    /// 형식 오류로 건너뛴 라인 수
    pub skipped_count: u64,
    /// `untagged`로 분류된 라인 수
    pub untagged_count: u64,
    /// `ignore_blank_lines` 설정으로 무시된 빈 라인 수
    pub ignored_blank_lines: u64,
}

impl PipelineReport {
    /// 두 카운터의 합계가 분류된 라인 수와 같고,
    /// 분류 + 건너뜀이 전체 라인 수와 같은지 확인합니다.
    pub fn is_consistent(&self) -> bool {
        self.counts.tag_total() == self.classified_count
            && self.counts.port_protocol_total() == self.classified_count
            && self.classified_count + self.skipped_count == self.total_lines
    }
}

/// 워커 하나의 누적 상태
#[derive(Debug, Default)]
struct RunState {
    aggregator: Aggregator,
    total_lines: u64,
    skipped: u64,
    untagged: u64,
    ignored_blank: u64,
}

impl RunState {
    fn merge(&mut self, other: RunState) {
        self.aggregator.merge(other.aggregator);
        self.total_lines += other.total_lines;
        self.skipped += other.skipped;
        self.untagged += other.untagged;
        self.ignored_blank += other.ignored_blank;
    }
}

/// 태깅 파이프라인
///
/// 룩업 테이블을 빌려 사용하며, 같은 입력에 대해 여러 번 실행해도
/// 같은 결과를 반환합니다.
pub struct TaggingPipeline<'t> {
    classifier: RecordClassifier<'t>,
    config: TaggerConfig,
    warnings_emitted: AtomicUsize,
}

impl<'t> TaggingPipeline<'t> {
    /// 기본 분류기로 파이프라인을 생성합니다.
    pub fn new(table: &'t LookupTable, config: TaggerConfig) -> Self {
        Self::with_classifier(RecordClassifier::new(table), config)
    }

    /// 지정한 분류기로 파이프라인을 생성합니다.
    pub fn with_classifier(classifier: RecordClassifier<'t>, config: TaggerConfig) -> Self {
        Self {
            classifier,
            config,
            warnings_emitted: AtomicUsize::new(0),
        }
    }

    /// 파이프라인 설정
    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// 라인 시퀀스를 입력 순서대로 처리합니다.
    pub fn run<I, S>(&self, lines: I) -> PipelineReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.warnings_emitted.store(0, Ordering::Relaxed);

        let mut state = RunState::default();
        for (index, line) in lines.into_iter().enumerate() {
            self.process_line(&mut state, index as u64 + 1, line.as_ref());
        }
        self.finish(state)
    }

    /// 메모리에 있는 라인들을 설정된 워커 수로 나눠 처리합니다.
    ///
    /// 워커별 집계기를 마지막에 합치므로 카운터에 대한 잠금이 없습니다.
    pub fn run_partitioned<S>(&self, lines: &[S]) -> PipelineReport
    where
        S: AsRef<str> + Sync,
    {
        let workers = self.config.workers.max(1);
        if workers == 1 || lines.len() < 2 {
            return self.run(lines);
        }

        self.warnings_emitted.store(0, Ordering::Relaxed);

        let chunk_size = lines.len().div_ceil(workers);
        tracing::debug!(workers, chunk_size, lines = lines.len(), "partitioned run");

        let states: Vec<RunState> = std::thread::scope(|scope| {
            let handles: Vec<_> = lines
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let offset = (chunk_index * chunk_size) as u64;
                    scope.spawn(move || {
                        let mut state = RunState::default();
                        for (i, line) in chunk.iter().enumerate() {
                            self.process_line(&mut state, offset + i as u64 + 1, line.as_ref());
                        }
                        state
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });

        let mut merged = RunState::default();
        for state in states {
            merged.merge(state);
        }
        self.finish(merged)
    }

    /// 버퍼 리더에서 라인을 읽어 처리합니다.
    ///
    /// # Errors
    /// 읽기 도중 I/O 에러(유효하지 않은 UTF-8 포함)가 발생하면
    /// [`TaggerError::SourceRead`]로 전체 실행을 중단합니다.
    pub fn run_reader<R: BufRead>(&self, reader: R) -> Result<PipelineReport, TaggerError> {
        if !self.config.is_sequential() {
            let lines = collect_lines(reader)?;
            return Ok(self.run_partitioned(&lines));
        }

        self.warnings_emitted.store(0, Ordering::Relaxed);

        let mut state = RunState::default();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index as u64 + 1;
            let line = line.map_err(|e| TaggerError::SourceRead {
                line: line_number,
                reason: e.to_string(),
            })?;
            self.process_line(&mut state, line_number, &line);
        }
        Ok(self.finish(state))
    }

    /// 플로우 로그 파일을 열어 처리합니다.
    ///
    /// # Errors
    /// 파일을 열 수 없으면 [`TaggerError::SourceUnavailable`]을 반환합니다.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<PipelineReport, TaggerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TaggerError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            path = %path.display(),
            workers = self.config.workers,
            format = self.classifier.format_name(),
            "processing flow log"
        );
        self.run_reader(BufReader::new(file))
    }

    fn process_line(&self, state: &mut RunState, line_number: u64, line: &str) {
        if self.config.ignore_blank_lines && line.trim().is_empty() {
            state.ignored_blank += 1;
            return;
        }

        state.total_lines += 1;

        match self.classifier.classify(line) {
            Ok(classification) => {
                if classification.tag == UNTAGGED {
                    state.untagged += 1;
                }
                state.aggregator.record_classification(classification);
            }
            Err(err) => {
                state.skipped += 1;
                self.report_skip(line_number, &err);
            }
        }
    }

    fn report_skip(&self, line_number: u64, err: &ParseError) {
        let emitted = self.warnings_emitted.fetch_add(1, Ordering::Relaxed);
        if emitted < self.config.max_skip_warnings {
            tracing::warn!(
                line_number,
                line = %err.line(),
                error = %err,
                "skipped line (format issue)"
            );
        } else {
            tracing::debug!(
                line_number,
                line = %err.line(),
                error = %err,
                "skipped line (format issue)"
            );
        }
    }

    fn finish(&self, state: RunState) -> PipelineReport {
        for (protocol, count) in state.aggregator.protocol_totals() {
            if count > 0 {
                metrics::counter!(m::LINES_PROCESSED_TOTAL, m::LABEL_PROTOCOL => protocol.as_str())
                    .increment(count);
            }
        }
        metrics::counter!(m::LINES_SKIPPED_TOTAL).increment(state.skipped);
        metrics::counter!(m::LINES_UNTAGGED_TOTAL).increment(state.untagged);

        let report = PipelineReport {
            counts: state.aggregator.snapshot(),
            total_lines: state.total_lines,
            classified_count: state.aggregator.total(),
            skipped_count: state.skipped,
            untagged_count: state.untagged,
            ignored_blank_lines: state.ignored_blank,
        };

        if report.skipped_count > 0 {
            tracing::warn!(
                skipped = report.skipped_count,
                total = report.total_lines,
                "skipped {} logs due to format issues",
                report.skipped_count
            );
        } else {
            tracing::info!(total = report.total_lines, "no lines skipped");
        }
        tracing::info!(
            classified = report.classified_count,
            untagged = report.untagged_count,
            tags = report.counts.tag_counts.len(),
            "flow log tagging complete"
        );

        report
    }
}

fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<String>, TaggerError> {
    reader
        .lines()
        .enumerate()
        .map(|(index, line)| {
            line.map_err(|e| TaggerError::SourceRead {
                line: index as u64 + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// 기본 설정으로 라인 시퀀스를 처리합니다.
pub fn run<I, S>(lines: I, table: &LookupTable) -> PipelineReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TaggingPipeline::new(table, TaggerConfig::default()).run(lines)
}
