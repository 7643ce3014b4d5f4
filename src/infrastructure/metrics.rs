//! Process-level counters for ledger operations, exposed on `/metrics` in
//! the Prometheus text format.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, TextEncoder, opts, register_int_counter_vec};

lazy_static! {
  /// Mutating ledger operations, labelled by operation name.
  pub static ref LEDGER_OPERATIONS: IntCounterVec = register_int_counter_vec!(
    opts!(
      "sortie_ledger_operations_total",
      "Completed delivery note ledger operations"
    ),
    &["operation"]
  )
  .expect("ledger operations counter registration");
}

pub async fn metrics_handler() -> HttpResponse {
  let encoder = TextEncoder::new();
  let metric_families = prometheus::gather();
  let mut buffer = Vec::new();
  if encoder.encode(&metric_families, &mut buffer).is_err() {
    return HttpResponse::InternalServerError().finish();
  }

  HttpResponse::Ok()
    .content_type(encoder.format_type())
    .body(buffer)
}
