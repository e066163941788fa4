//! 목록 조회 결과에서 이름 찾기

use iam_lifecycle_core::Named;

/// `entries`에 이름이 `name`인 엔티티가 있는지 확인합니다.
///
/// 대소문자를 구분하는 정확한 비교이며, 빈 목록은 항상 `false`입니다.
pub fn is_present<T: Named>(name: &str, entries: &[T]) -> bool {
    entries.iter().any(|entry| entry.name() == name)
}
