//! 주문 문서.
//!
//! 주문 본문은 클라이언트가 보낸 JSON 객체 그대로 저장됩니다. 서버가 직접
//! 쓰는 필드는 결제 완료 기록(`paid`, `transactionId`)뿐입니다.
//! 주문의 소유권은 `email` 필드로만 결정됩니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{to_document, Document};
use crate::error::CoreResult;

/// 주문자 이메일 필드 (소유권 판단 기준).
pub const EMAIL_FIELD: &str = "email";

/// 결제 완료 여부 필드.
pub const PAID_FIELD: &str = "paid";

/// 결제 완료 기록 요청.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// 결제 트랜잭션 ID (받은 값 그대로 기록)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = Option<String>))]
    pub transaction_id: Option<Value>,
}

impl PaymentRecord {
    /// 주문에 병합할 결제 완료 필드.
    pub fn to_update(&self) -> CoreResult<Document> {
        let mut set = to_document(self)?;
        set.insert(PAID_FIELD.to_string(), Value::Bool(true));
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_update_sets_paid_and_transaction() {
        let record: PaymentRecord =
            serde_json::from_value(json!({"transactionId": "pi_123", "amount": 5})).unwrap();

        let set = record.to_update().unwrap();
        assert_eq!(Value::Object(set), json!({"paid": true, "transactionId": "pi_123"}));
    }

    #[test]
    fn test_missing_transaction_id_is_not_written() {
        let record: PaymentRecord = serde_json::from_value(json!({})).unwrap();

        let set = record.to_update().unwrap();
        assert_eq!(Value::Object(set), json!({"paid": true}));
    }
}
