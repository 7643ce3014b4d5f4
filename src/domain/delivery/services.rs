use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::ProductRepository;
use crate::domain::parties::{AgentRepository, ClientRepository};

use super::entities::{DeliveryLine, DeliveryNote};
use super::errors::DeliveryError;
use super::ports::DeliveryNoteStore;
use super::value_objects::{DelivererName, DocumentNumber, Quantity, UnitPrice};

/// One line of caller input. Line totals are never accepted from callers;
/// the ledger derives them when building entities.
pub struct LineInput {
  pub product_id: Uuid,
  pub unit_price: UnitPrice,
  pub quantity: Quantity,
}

pub struct NoteData {
  pub document_number: DocumentNumber,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<DelivererName>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  pub lines: Vec<LineInput>,
}

pub struct NoteUpdateData {
  pub document_number: DocumentNumber,
  pub issued_date: NaiveDate,
  pub deliverer_name: Option<DelivererName>,
  pub agent_id: Uuid,
  pub client_id: Uuid,
  pub lines: Vec<LineInput>,
  /// The version the caller read. A mismatch at commit time means someone
  /// else mutated the note in between and yields `DeliveryError::Conflict`.
  pub expected_version: i64,
}

/// Owns delivery notes and their lines and keeps the stored totals
/// consistent: every line total equals unit price times quantity, and every
/// header total equals the sum of its line totals, after each operation.
///
/// Required-field rules, minimum line counts and capability checks run at
/// the boundary before these methods are invoked. The ledger still re-derives
/// every computed field and re-checks referenced entities, because it is the
/// last writer before the store.
pub struct DeliveryNoteLedger {
  store: Arc<dyn DeliveryNoteStore>,
  products: Arc<dyn ProductRepository>,
  agents: Arc<dyn AgentRepository>,
  clients: Arc<dyn ClientRepository>,
}

impl DeliveryNoteLedger {
  pub fn new(
    store: Arc<dyn DeliveryNoteStore>,
    products: Arc<dyn ProductRepository>,
    agents: Arc<dyn AgentRepository>,
    clients: Arc<dyn ClientRepository>,
  ) -> Self {
    Self {
      store,
      products,
      agents,
      clients,
    }
  }

  pub async fn create_note(
    &self,
    data: NoteData,
  ) -> Result<(DeliveryNote, Vec<DeliveryLine>), DeliveryError> {
    if self
      .store
      .exists_by_number(data.document_number.value(), None)
      .await?
    {
      return Err(DeliveryError::DocumentNumberAlreadyExists(
        data.document_number.into_inner(),
      ));
    }

    self.verify_references(data.agent_id, data.client_id).await?;

    let note = DeliveryNote::new(
      data.document_number,
      data.issued_date,
      data.deliverer_name,
      data.agent_id,
      data.client_id,
    );
    let lines = self.build_lines(note.id, data.lines).await?;

    let created = self.store.create(note, lines.clone()).await?;

    tracing::info!(
      note_id = %created.id,
      document_number = %created.document_number,
      total = %created.total,
      "Delivery note created"
    );

    Ok((created, lines))
  }

  /// Update the header and replace the full line set. Partial line patches
  /// are not supported: the caller always sends the complete replacement.
  pub async fn update_note(
    &self,
    note_id: Uuid,
    data: NoteUpdateData,
  ) -> Result<(DeliveryNote, Vec<DeliveryLine>), DeliveryError> {
    let mut note = self
      .store
      .find_by_id(note_id)
      .await?
      .ok_or(DeliveryError::NoteNotFound(note_id))?;

    if self
      .store
      .exists_by_number(data.document_number.value(), Some(note_id))
      .await?
    {
      return Err(DeliveryError::DocumentNumberAlreadyExists(
        data.document_number.into_inner(),
      ));
    }

    self.verify_references(data.agent_id, data.client_id).await?;

    note.update_header(
      data.document_number,
      data.issued_date,
      data.deliverer_name,
      data.agent_id,
      data.client_id,
    );
    // Carry the caller's version so the store can detect a concurrent write.
    note.version = data.expected_version;

    let lines = self.build_lines(note_id, data.lines).await?;
    let updated = self.store.update(note, lines.clone()).await?;

    tracing::info!(
      note_id = %updated.id,
      total = %updated.total,
      line_count = lines.len(),
      "Delivery note lines replaced"
    );

    Ok((updated, lines))
  }

  pub async fn delete_note(&self, note_id: Uuid) -> Result<(), DeliveryError> {
    self.store.delete(note_id).await?;
    tracing::info!(note_id = %note_id, "Delivery note deleted");
    Ok(())
  }

  /// Re-derive the stored header total from the persisted line totals. The
  /// single authoritative routine for the header invariant; the store runs
  /// the same statement as the final step of every mutating transaction, so
  /// a standalone call is only needed to repair drift.
  pub async fn recompute_total(&self, note_id: Uuid) -> Result<Decimal, DeliveryError> {
    if self.store.find_by_id(note_id).await?.is_none() {
      return Err(DeliveryError::NoteNotFound(note_id));
    }
    self.store.recompute_total(note_id).await
  }

  pub async fn get_note(
    &self,
    note_id: Uuid,
  ) -> Result<(DeliveryNote, Vec<DeliveryLine>), DeliveryError> {
    let note = self
      .store
      .find_by_id(note_id)
      .await?
      .ok_or(DeliveryError::NoteNotFound(note_id))?;
    let lines = self.store.find_lines(note_id).await?;
    Ok((note, lines))
  }

  pub async fn list_notes(
    &self,
  ) -> Result<Vec<(DeliveryNote, Vec<DeliveryLine>)>, DeliveryError> {
    let notes = self.store.list().await?;
    let ids: Vec<Uuid> = notes.iter().map(|n| n.id).collect();
    let mut all_lines = self.store.find_lines_for_notes(&ids).await?;

    Ok(
      notes
        .into_iter()
        .map(|note| {
          let lines: Vec<DeliveryLine> = all_lines
            .extract_if(.., |line| line.note_id == note.id)
            .collect();
          (note, lines)
        })
        .collect(),
    )
  }

  async fn verify_references(
    &self,
    agent_id: Uuid,
    client_id: Uuid,
  ) -> Result<(), DeliveryError> {
    if self.agents.find_by_id(agent_id).await?.is_none() {
      return Err(DeliveryError::AgentNotFound(agent_id));
    }
    if self.clients.find_by_id(client_id).await?.is_none() {
      return Err(DeliveryError::ClientNotFound(client_id));
    }
    Ok(())
  }

  /// Resolve products, snapshot their reference codes and derive line totals.
  async fn build_lines(
    &self,
    note_id: Uuid,
    inputs: Vec<LineInput>,
  ) -> Result<Vec<DeliveryLine>, DeliveryError> {
    let mut lines = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
      let product = self
        .products
        .find_by_id(input.product_id)
        .await?
        .ok_or(DeliveryError::ProductNotFound(input.product_id))?;

      lines.push(DeliveryLine::new(
        note_id,
        product.id,
        product.reference,
        input.unit_price,
        input.quantity,
        (i + 1) as i32,
      ));
    }
    Ok(lines)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::catalog::Product;
  use crate::domain::parties::{Agent, Client};
  use async_trait::async_trait;
  use rust_decimal_macros::dec;
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::sync::atomic::{AtomicUsize, Ordering};

  #[derive(Default, Clone)]
  struct MemState {
    notes: HashMap<Uuid, DeliveryNote>,
    lines: HashMap<Uuid, DeliveryLine>,
  }

  /// In-memory store with transaction semantics: mutations are staged on a
  /// copy of the state and only swapped in on success, so a failure midway
  /// leaves the visible state untouched. `fail_after_line_inserts` injects a
  /// storage failure once that many line inserts have been attempted.
  #[derive(Default)]
  struct MemStore {
    state: Mutex<MemState>,
    line_inserts: AtomicUsize,
    fail_after_line_inserts: Option<usize>,
  }

  impl MemStore {
    fn insert_line(&self, staged: &mut MemState, line: DeliveryLine) -> Result<(), DeliveryError> {
      let attempted = self.line_inserts.fetch_add(1, Ordering::SeqCst) + 1;
      if let Some(limit) = self.fail_after_line_inserts {
        if attempted >= limit {
          return Err(DeliveryError::Repository(
            "injected line insert failure".to_string(),
          ));
        }
      }
      staged.lines.insert(line.id, line);
      Ok(())
    }

    fn recompute_in(state: &mut MemState, note_id: Uuid) -> Decimal {
      let total: Decimal = state
        .lines
        .values()
        .filter(|l| l.note_id == note_id)
        .map(|l| l.line_total)
        .sum();
      if let Some(note) = state.notes.get_mut(&note_id) {
        note.total = total;
      }
      total
    }
  }

  #[async_trait]
  impl DeliveryNoteStore for MemStore {
    async fn create(
      &self,
      note: DeliveryNote,
      lines: Vec<DeliveryLine>,
    ) -> Result<DeliveryNote, DeliveryError> {
      let mut guard = self.state.lock().unwrap();
      let mut staged = guard.clone();
      let note_id = note.id;
      staged.notes.insert(note_id, note);
      for line in lines {
        self.insert_line(&mut staged, line)?;
      }
      Self::recompute_in(&mut staged, note_id);
      let created = staged.notes.get(&note_id).cloned().unwrap();
      *guard = staged;
      Ok(created)
    }

    async fn update(
      &self,
      note: DeliveryNote,
      lines: Vec<DeliveryLine>,
    ) -> Result<DeliveryNote, DeliveryError> {
      let mut guard = self.state.lock().unwrap();
      let mut staged = guard.clone();
      let note_id = note.id;
      let stored = staged
        .notes
        .get(&note_id)
        .ok_or(DeliveryError::NoteNotFound(note_id))?;
      if stored.version != note.version {
        return Err(DeliveryError::Conflict {
          note_id,
          expected: note.version,
        });
      }
      let mut note = note;
      note.version += 1;
      staged.notes.insert(note_id, note);
      staged.lines.retain(|_, l| l.note_id != note_id);
      for line in lines {
        self.insert_line(&mut staged, line)?;
      }
      Self::recompute_in(&mut staged, note_id);
      let updated = staged.notes.get(&note_id).cloned().unwrap();
      *guard = staged;
      Ok(updated)
    }

    async fn delete(&self, note_id: Uuid) -> Result<(), DeliveryError> {
      let mut guard = self.state.lock().unwrap();
      if guard.notes.remove(&note_id).is_none() {
        return Err(DeliveryError::NoteNotFound(note_id));
      }
      guard.lines.retain(|_, l| l.note_id != note_id);
      Ok(())
    }

    async fn recompute_total(&self, note_id: Uuid) -> Result<Decimal, DeliveryError> {
      let mut guard = self.state.lock().unwrap();
      if !guard.notes.contains_key(&note_id) {
        return Err(DeliveryError::NoteNotFound(note_id));
      }
      let mut staged = guard.clone();
      let total = Self::recompute_in(&mut staged, note_id);
      *guard = staged;
      Ok(total)
    }

    async fn find_by_id(&self, note_id: Uuid) -> Result<Option<DeliveryNote>, DeliveryError> {
      Ok(self.state.lock().unwrap().notes.get(&note_id).cloned())
    }

    async fn find_lines(&self, note_id: Uuid) -> Result<Vec<DeliveryLine>, DeliveryError> {
      let mut lines: Vec<DeliveryLine> = self
        .state
        .lock()
        .unwrap()
        .lines
        .values()
        .filter(|l| l.note_id == note_id)
        .cloned()
        .collect();
      lines.sort_by_key(|l| l.line_order);
      Ok(lines)
    }

    async fn list(&self) -> Result<Vec<DeliveryNote>, DeliveryError> {
      Ok(self.state.lock().unwrap().notes.values().cloned().collect())
    }

    async fn find_lines_for_notes(
      &self,
      note_ids: &[Uuid],
    ) -> Result<Vec<DeliveryLine>, DeliveryError> {
      Ok(
        self
          .state
          .lock()
          .unwrap()
          .lines
          .values()
          .filter(|l| note_ids.contains(&l.note_id))
          .cloned()
          .collect(),
      )
    }

    async fn exists_by_number(
      &self,
      document_number: &str,
      exclude_id: Option<Uuid>,
    ) -> Result<bool, DeliveryError> {
      Ok(self.state.lock().unwrap().notes.values().any(|n| {
        n.document_number.value() == document_number && Some(n.id) != exclude_id
      }))
    }
  }

  struct MemProducts(HashMap<Uuid, Product>);

  #[async_trait]
  impl ProductRepository for MemProducts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DeliveryError> {
      Ok(self.0.get(&id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>, DeliveryError> {
      Ok(self.0.values().filter(|p| p.is_active).cloned().collect())
    }
  }

  struct MemAgents(HashMap<Uuid, Agent>);

  #[async_trait]
  impl AgentRepository for MemAgents {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DeliveryError> {
      Ok(self.0.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Agent>, DeliveryError> {
      Ok(self.0.values().cloned().collect())
    }
  }

  struct MemClients(HashMap<Uuid, Client>);

  #[async_trait]
  impl ClientRepository for MemClients {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DeliveryError> {
      Ok(self.0.get(&id).cloned())
    }

    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Client>, DeliveryError> {
      Ok(
        self
          .0
          .values()
          .filter(|c| c.agent_id == agent_id)
          .cloned()
          .collect(),
      )
    }

    async fn list(&self) -> Result<Vec<Client>, DeliveryError> {
      Ok(self.0.values().cloned().collect())
    }
  }

  struct Fixture {
    ledger: DeliveryNoteLedger,
    store: Arc<MemStore>,
    agent_id: Uuid,
    client_id: Uuid,
    product_1: Uuid,
    product_2: Uuid,
    product_3: Uuid,
  }

  fn fixture_with_store(store: MemStore) -> Fixture {
    let agent_id = Uuid::new_v4();
    let client_id = Uuid::new_v4();
    let product_1 = Uuid::new_v4();
    let product_2 = Uuid::new_v4();
    let product_3 = Uuid::new_v4();

    let products = HashMap::from([
      (
        product_1,
        Product {
          id: product_1,
          reference: "P1".to_string(),
          label: "Crate of water".to_string(),
          unit_price: dec!(100.00),
          is_active: true,
        },
      ),
      (
        product_2,
        Product {
          id: product_2,
          reference: "P2".to_string(),
          label: "Crate of soda".to_string(),
          unit_price: dec!(50.00),
          is_active: true,
        },
      ),
      (
        product_3,
        Product {
          id: product_3,
          reference: "P3".to_string(),
          label: "Crate of juice".to_string(),
          unit_price: dec!(10.00),
          is_active: true,
        },
      ),
    ]);
    let agents = HashMap::from([(
      agent_id,
      Agent {
        id: agent_id,
        code: "C-01".to_string(),
        full_name: "Rachid".to_string(),
        phone: None,
      },
    )]);
    let clients = HashMap::from([(
      client_id,
      Client {
        id: client_id,
        code: "CL-01".to_string(),
        full_name: "Epicerie du Port".to_string(),
        phone: None,
        agent_id,
      },
    )]);

    let store = Arc::new(store);
    let ledger = DeliveryNoteLedger::new(
      store.clone(),
      Arc::new(MemProducts(products)),
      Arc::new(MemAgents(agents)),
      Arc::new(MemClients(clients)),
    );

    Fixture {
      ledger,
      store,
      agent_id,
      client_id,
      product_1,
      product_2,
      product_3,
    }
  }

  fn fixture() -> Fixture {
    fixture_with_store(MemStore::default())
  }

  fn line_input(product_id: Uuid, price: Decimal, quantity: i32) -> LineInput {
    LineInput {
      product_id,
      unit_price: UnitPrice::new(price).unwrap(),
      quantity: Quantity::new(quantity).unwrap(),
    }
  }

  fn note_data(fx: &Fixture, number: &str, lines: Vec<LineInput>) -> NoteData {
    NoteData {
      document_number: DocumentNumber::new(number.to_string()).unwrap(),
      issued_date: NaiveDate::from_ymd_opt(2025, 7, 23).unwrap(),
      deliverer_name: Some(DelivererName::new("Karim".to_string()).unwrap()),
      agent_id: fx.agent_id,
      client_id: fx.client_id,
      lines,
    }
  }

  fn update_data(fx: &Fixture, number: &str, lines: Vec<LineInput>, version: i64) -> NoteUpdateData {
    NoteUpdateData {
      document_number: DocumentNumber::new(number.to_string()).unwrap(),
      issued_date: NaiveDate::from_ymd_opt(2025, 7, 24).unwrap(),
      deliverer_name: Some(DelivererName::new("Karim".to_string()).unwrap()),
      agent_id: fx.agent_id,
      client_id: fx.client_id,
      lines,
      expected_version: version,
    }
  }

  #[tokio::test]
  async fn test_create_note_derives_line_and_header_totals() {
    let fx = fixture();
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(100.00), 3),
        line_input(fx.product_2, dec!(50.00), 2),
      ],
    );

    let (note, lines) = fx.ledger.create_note(data).await.unwrap();

    assert_eq!(lines[0].line_total, dec!(300.00));
    assert_eq!(lines[1].line_total, dec!(100.00));
    assert_eq!(note.total, dec!(400.00));

    // Invariants hold at rest, not just on the returned values
    let stored = fx.store.find_by_id(note.id).await.unwrap().unwrap();
    assert_eq!(stored.total, dec!(400.00));
    let stored_lines = fx.store.find_lines(note.id).await.unwrap();
    for line in &stored_lines {
      assert_eq!(
        line.line_total,
        line.unit_price.value() * line.quantity.as_decimal()
      );
    }
    assert_eq!(DeliveryNote::total_of(&stored_lines), stored.total);
  }

  #[tokio::test]
  async fn test_create_note_snapshots_product_reference() {
    let fx = fixture();
    let data = note_data(&fx, "BL-001", vec![line_input(fx.product_1, dec!(5.00), 1)]);
    let (_, lines) = fx.ledger.create_note(data).await.unwrap();
    assert_eq!(lines[0].product_ref, "P1");
  }

  #[tokio::test]
  async fn test_create_note_rejects_duplicate_document_number() {
    let fx = fixture();
    let first = note_data(&fx, "BL-001", vec![line_input(fx.product_1, dec!(10.00), 1)]);
    fx.ledger.create_note(first).await.unwrap();

    let second = note_data(&fx, "BL-001", vec![line_input(fx.product_2, dec!(20.00), 1)]);
    let err = fx.ledger.create_note(second).await.unwrap_err();
    assert!(matches!(err, DeliveryError::DocumentNumberAlreadyExists(n) if n == "BL-001"));

    // The failed call left no trace
    assert_eq!(fx.store.list().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_create_note_unknown_product_leaves_no_state() {
    let fx = fixture();
    let missing = Uuid::new_v4();
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(10.00), 1),
        line_input(missing, dec!(20.00), 1),
      ],
    );

    let err = fx.ledger.create_note(data).await.unwrap_err();
    assert!(matches!(err, DeliveryError::ProductNotFound(id) if id == missing));
    assert!(fx.store.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_create_note_atomic_on_storage_failure() {
    // Fail on the last line of a three-line batch: nothing may persist.
    let fx = fixture_with_store(MemStore {
      fail_after_line_inserts: Some(3),
      ..MemStore::default()
    });
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(10.00), 1),
        line_input(fx.product_2, dec!(20.00), 1),
        line_input(fx.product_3, dec!(30.00), 1),
      ],
    );

    let err = fx.ledger.create_note(data).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Repository(_)));
    assert!(fx.store.list().await.unwrap().is_empty());
    assert!(
      fx.store
        .find_lines_for_notes(&[])
        .await
        .unwrap()
        .is_empty()
    );
  }

  #[tokio::test]
  async fn test_replace_lines_recomputes_total() {
    let fx = fixture();
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(100.00), 3),
        line_input(fx.product_2, dec!(50.00), 2),
      ],
    );
    let (note, _) = fx.ledger.create_note(data).await.unwrap();
    assert_eq!(note.total, dec!(400.00));

    let update = update_data(
      &fx,
      "BL-001",
      vec![line_input(fx.product_3, dec!(10.00), 1)],
      note.version,
    );
    let (updated, lines) = fx.ledger.update_note(note.id, update).await.unwrap();

    assert_eq!(updated.total, dec!(10.00));
    assert_eq!(lines.len(), 1);
    assert_eq!(updated.version, note.version + 1);

    // The two original lines no longer exist
    let stored_lines = fx.store.find_lines(note.id).await.unwrap();
    assert_eq!(stored_lines.len(), 1);
    assert_eq!(stored_lines[0].product_ref, "P3");
  }

  #[tokio::test]
  async fn test_replace_lines_with_empty_set_is_permitted_by_ledger() {
    // The minimum-one-line rule is a caller precondition; the ledger itself
    // accepts an empty replacement and lands on a zero total.
    let fx = fixture();
    let data = note_data(&fx, "BL-001", vec![line_input(fx.product_1, dec!(25.00), 4)]);
    let (note, _) = fx.ledger.create_note(data).await.unwrap();

    let update = update_data(&fx, "BL-001", vec![], note.version);
    let (updated, _) = fx.ledger.update_note(note.id, update).await.unwrap();

    assert_eq!(updated.total, Decimal::ZERO);
    assert!(fx.store.find_lines(note.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_update_with_stale_version_conflicts() {
    let fx = fixture();
    let data = note_data(&fx, "BL-001", vec![line_input(fx.product_1, dec!(10.00), 1)]);
    let (note, _) = fx.ledger.create_note(data).await.unwrap();

    let winner = update_data(
      &fx,
      "BL-001",
      vec![line_input(fx.product_2, dec!(20.00), 1)],
      note.version,
    );
    fx.ledger.update_note(note.id, winner).await.unwrap();

    // Second writer still holds the old version
    let loser = update_data(
      &fx,
      "BL-001",
      vec![line_input(fx.product_3, dec!(30.00), 1)],
      note.version,
    );
    let err = fx.ledger.update_note(note.id, loser).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Conflict { .. }));

    // The first writer's state survives
    let (_, lines) = fx.ledger.get_note(note.id).await.unwrap();
    assert_eq!(lines[0].product_ref, "P2");
  }

  #[tokio::test]
  async fn test_delete_note_cascades_to_lines() {
    let fx = fixture();
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(10.00), 1),
        line_input(fx.product_2, dec!(20.00), 2),
      ],
    );
    let (note, _) = fx.ledger.create_note(data).await.unwrap();

    fx.ledger.delete_note(note.id).await.unwrap();

    assert!(fx.store.find_by_id(note.id).await.unwrap().is_none());
    assert!(fx.store.find_lines(note.id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_delete_missing_note_is_not_found() {
    let fx = fixture();
    let err = fx.ledger.delete_note(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::NoteNotFound(_)));
  }

  #[tokio::test]
  async fn test_recompute_total_is_idempotent() {
    let fx = fixture();
    let data = note_data(
      &fx,
      "BL-001",
      vec![
        line_input(fx.product_1, dec!(100.00), 3),
        line_input(fx.product_2, dec!(50.00), 2),
      ],
    );
    let (note, _) = fx.ledger.create_note(data).await.unwrap();

    let first = fx.ledger.recompute_total(note.id).await.unwrap();
    let second = fx.ledger.recompute_total(note.id).await.unwrap();
    assert_eq!(first, dec!(400.00));
    assert_eq!(first, second);
    assert_eq!(
      fx.store.find_by_id(note.id).await.unwrap().unwrap().total,
      dec!(400.00)
    );
  }

  #[tokio::test]
  async fn test_update_missing_note_is_not_found() {
    let fx = fixture();
    let update = update_data(&fx, "BL-404", vec![], 1);
    let err = fx
      .ledger
      .update_note(Uuid::new_v4(), update)
      .await
      .unwrap_err();
    assert!(matches!(err, DeliveryError::NoteNotFound(_)));
  }

  #[tokio::test]
  async fn test_create_note_unknown_agent_or_client() {
    let fx = fixture();
    let mut data = note_data(&fx, "BL-001", vec![line_input(fx.product_1, dec!(1.00), 1)]);
    data.agent_id = Uuid::new_v4();
    let err = fx.ledger.create_note(data).await.unwrap_err();
    assert!(matches!(err, DeliveryError::AgentNotFound(_)));

    let mut data = note_data(&fx, "BL-002", vec![line_input(fx.product_1, dec!(1.00), 1)]);
    data.client_id = Uuid::new_v4();
    let err = fx.ledger.create_note(data).await.unwrap_err();
    assert!(matches!(err, DeliveryError::ClientNotFound(_)));
  }
}
