//! 메트릭 상수 및 설명 등록
//!
//! 시나리오 실행 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! CLI는 `run --metrics-file`이 주어지면 Prometheus 레코더를 설치하고
//! 실행 후 텍스트 형식으로 내보냅니다. 레코더가 없으면 매크로는 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `iam_lifecycle_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(iam_lifecycle_core::metrics::SCENARIO_STEPS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (passed, failed / deleted, already_absent, failed)
pub const LABEL_RESULT: &str = "result";

/// 엔티티 종류 레이블 키 (user, group)
pub const LABEL_KIND: &str = "kind";

/// 스텝 레이블 키
pub const LABEL_STEP: &str = "step";

// ─── 시나리오 메트릭 ───────────────────────────────────────────────

/// 시나리오 실행 수 (counter, label: result)
pub const SCENARIO_RUNS_TOTAL: &str = "iam_lifecycle_scenario_runs_total";

/// 시작된 스텝 수 (counter, label: step)
pub const SCENARIO_STEPS_TOTAL: &str = "iam_lifecycle_scenario_steps_total";

/// 실패한 스텝 수 (counter, label: step)
pub const SCENARIO_STEP_FAILURES_TOTAL: &str = "iam_lifecycle_scenario_step_failures_total";

/// 시나리오 실행 시간 (histogram, 초)
pub const SCENARIO_DURATION_SECONDS: &str = "iam_lifecycle_scenario_duration_seconds";

/// 정리 작업 수 (counter, labels: kind, result)
pub const CLEANUP_TASKS_TOTAL: &str = "iam_lifecycle_cleanup_tasks_total";

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        SCENARIO_RUNS_TOTAL,
        "Total number of lifecycle scenario runs by result"
    );
    describe_counter!(
        SCENARIO_STEPS_TOTAL,
        "Total number of scenario steps started"
    );
    describe_counter!(
        SCENARIO_STEP_FAILURES_TOTAL,
        "Total number of scenario steps that failed"
    );
    describe_histogram!(
        SCENARIO_DURATION_SECONDS,
        "Wall-clock duration of a scenario run including cleanup, in seconds"
    );
    describe_counter!(
        CLEANUP_TASKS_TOTAL,
        "Total number of cleanup tasks executed by entity kind and result"
    );
}
