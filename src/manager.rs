//! The gate in front of the customer store. Every mutation goes through here
//! so validation and duplicate-email checks always run first, and observers
//! hear about each change right after it lands.

use std::sync::mpsc::Sender;

use tracing::{debug, info};

use crate::error::CustomerError;
use crate::models::{validate_fields, Customer, NewCustomer};
use crate::store::CustomerCollection;

/// Result of `CustomerManager::add_customer` when the input was valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The record was stored under `id` at position `index`.
    Added { id: u32, index: usize },
    /// A record with the same email (ignoring case) already sits at `index`.
    Duplicate { index: usize },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Notification payload, carrying a copy of the affected record.
#[derive(Debug, Clone)]
pub enum CustomerEvent {
    Added(Customer),
    Updated(Customer),
    Deleted(Customer),
}

impl CustomerEvent {
    pub fn customer(&self) -> &Customer {
        match self {
            CustomerEvent::Added(customer)
            | CustomerEvent::Updated(customer)
            | CustomerEvent::Deleted(customer) => customer,
        }
    }
}

/// Receives change notifications. Callbacks run synchronously on the caller's
/// thread after the store has been updated.
pub trait CustomerObserver {
    fn on_added(&mut self, _customer: &Customer) {}
    fn on_updated(&mut self, _customer: &Customer) {}
    fn on_deleted(&mut self, _customer: &Customer) {}
}

/// Forward every notification into a channel. The terminal front-end drains
/// the receiving end after each call into the manager.
impl CustomerObserver for Sender<CustomerEvent> {
    fn on_added(&mut self, customer: &Customer) {
        let _ = self.send(CustomerEvent::Added(customer.clone()));
    }

    fn on_updated(&mut self, customer: &Customer) {
        let _ = self.send(CustomerEvent::Updated(customer.clone()));
    }

    fn on_deleted(&mut self, customer: &Customer) {
        let _ = self.send(CustomerEvent::Deleted(customer.clone()));
    }
}

/// Owns the store and the id counter. Ids start at 1 for every manager, so
/// two managers never share a sequence.
#[derive(Default)]
pub struct CustomerManager {
    customers: CustomerCollection<Customer>,
    last_id: u32,
    observers: Vec<Box<dyn CustomerObserver>>,
}

impl CustomerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn subscribe(&mut self, observer: impl CustomerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Validate `fields`, reject duplicates, then store the record under a
    /// freshly assigned id. Rejected records never consume an id.
    pub fn add_customer(&mut self, fields: NewCustomer) -> Result<AddOutcome, CustomerError> {
        if let Err(violation) = fields.validate() {
            debug!(%violation, "rejected invalid customer");
            return Err(violation.into());
        }

        if let Some(index) = self.customers.position(|c| c.same_email(&fields.email)) {
            debug!(email = %fields.email, index, "rejected duplicate email");
            return Ok(AddOutcome::Duplicate { index });
        }

        self.last_id += 1;
        let customer = Customer::with_id(self.last_id, fields);
        let id = customer.id();
        let index = self.customers.count();
        info!(id, email = %customer.email, "customer added");
        self.customers.push(customer.clone());

        for observer in &mut self.observers {
            observer.on_added(&customer);
        }
        Ok(AddOutcome::Added { id, index })
    }

    /// Overwrite the fields of the record at `index`. The new values are
    /// validated before anything is written, so a failed update leaves the
    /// record as it was.
    pub fn update_customer(
        &mut self,
        index: usize,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<(), CustomerError> {
        let customer = self.customers.get_mut(index)?;
        if let Err(violation) = validate_fields(first_name, last_name, email) {
            debug!(%violation, index, "rejected invalid update");
            return Err(violation.into());
        }

        customer.first_name = first_name.to_string();
        customer.last_name = last_name.to_string();
        customer.email = email.to_string();
        info!(id = customer.id(), email, "customer updated");

        let updated = customer.clone();
        for observer in &mut self.observers {
            observer.on_updated(&updated);
        }
        Ok(())
    }

    /// Remove the record at `index` and return it. Later records shift down.
    pub fn delete_customer(&mut self, index: usize) -> Result<Customer, CustomerError> {
        let removed = self.customers.remove_at(index)?;
        info!(id = removed.id(), "customer deleted");

        for observer in &mut self.observers {
            observer.on_deleted(&removed);
        }
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Result<&Customer, CustomerError> {
        Ok(self.customers.get(index)?)
    }

    /// Snapshot of every record in insertion order.
    pub fn all_customers(&self) -> Vec<Customer> {
        self.customers.all()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Position and record whose email matches `email`, ignoring case.
    pub fn find_by_email(&self, email: &str) -> Option<(usize, &Customer)> {
        let index = self.customers.position(|c| c.same_email(email))?;
        self.customers.get(index).ok().map(|customer| (index, customer))
    }

    pub fn count(&self) -> usize {
        self.customers.count()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::{channel, Receiver};

    use super::*;
    use crate::error::{IndexOutOfRange, Violation};

    fn with_channel() -> (CustomerManager, Receiver<CustomerEvent>) {
        let (tx, rx) = channel();
        let mut manager = CustomerManager::new();
        manager.subscribe(tx);
        (manager, rx)
    }

    fn add(manager: &mut CustomerManager, first: &str, last: &str, email: &str) -> AddOutcome {
        manager
            .add_customer(NewCustomer::new(first, last, email))
            .expect("valid customer")
    }

    #[test]
    fn add_assigns_sequential_ids_and_notifies_once() {
        let (mut manager, rx) = with_channel();
        assert_eq!(
            add(&mut manager, "Ann", "Lee", "ann@x.com"),
            AddOutcome::Added { id: 1, index: 0 }
        );
        assert_eq!(
            add(&mut manager, "Bob", "Roe", "bob@x.com"),
            AddOutcome::Added { id: 2, index: 1 }
        );
        assert_eq!(manager.count(), 2);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], CustomerEvent::Added(c) if c.id() == 1));
        assert!(matches!(&events[1], CustomerEvent::Added(c) if c.email == "bob@x.com"));
    }

    #[test]
    fn duplicate_email_is_reported_without_mutation() {
        let (mut manager, rx) = with_channel();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        rx.try_iter().for_each(drop);

        assert_eq!(
            add(&mut manager, "Bob", "Roe", "ANN@X.com"),
            AddOutcome::Duplicate { index: 0 }
        );
        assert_eq!(manager.count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn invalid_add_leaves_store_and_counter_untouched() {
        let (mut manager, rx) = with_channel();
        let err = manager
            .add_customer(NewCustomer::new("", "Lee", "ann@x.com"))
            .unwrap_err();
        assert_eq!(err, CustomerError::Invalid(Violation::BlankFirstName));
        assert!(manager.is_empty());
        assert!(rx.try_recv().is_err());

        assert_eq!(
            add(&mut manager, "Ann", "Lee", "ann@x.com"),
            AddOutcome::Added { id: 1, index: 0 }
        );
    }

    #[test]
    fn update_changes_only_the_target_and_keeps_id() {
        let (mut manager, rx) = with_channel();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        let _ = add(&mut manager, "Bob", "Roe", "bob@x.com");
        rx.try_iter().for_each(drop);

        manager
            .update_customer(1, "Robert", "Roe", "robert@x.com")
            .unwrap();

        let bob = manager.get(1).unwrap();
        assert_eq!(bob.id(), 2);
        assert_eq!(bob.full_name(), "Robert Roe");
        assert_eq!(bob.email, "robert@x.com");
        assert_eq!(manager.get(0).unwrap().email, "ann@x.com");
        assert_eq!(manager.count(), 2);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], CustomerEvent::Updated(c) if c.id() == 2));
    }

    #[test]
    fn invalid_update_keeps_previous_values() {
        let (mut manager, rx) = with_channel();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        rx.try_iter().for_each(drop);

        let err = manager
            .update_customer(0, "Ann", "Lee", "no-at-sign")
            .unwrap_err();
        assert_eq!(err, CustomerError::Invalid(Violation::InvalidEmail));
        assert_eq!(manager.get(0).unwrap().email, "ann@x.com");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delete_removes_that_record_and_shifts_the_rest() {
        let (mut manager, rx) = with_channel();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        let _ = add(&mut manager, "Bob", "Roe", "bob@x.com");
        let _ = add(&mut manager, "Cat", "Poe", "cat@x.com");
        rx.try_iter().for_each(drop);

        let removed = manager.delete_customer(1).unwrap();
        assert_eq!(removed.id(), 2);
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.get(1).unwrap().id(), 3);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].customer().id(), 2);
    }

    #[test]
    fn out_of_range_indices_fail_without_mutation() {
        let (mut manager, rx) = with_channel();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        rx.try_iter().for_each(drop);

        let expected = CustomerError::IndexOutOfRange(IndexOutOfRange { index: 1, count: 1 });
        assert_eq!(manager.get(1).unwrap_err(), expected);
        assert_eq!(
            manager.update_customer(1, "A", "B", "a@b").unwrap_err(),
            expected
        );
        assert_eq!(manager.delete_customer(1).unwrap_err(), expected);
        assert_eq!(manager.count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn out_of_range_update_wins_over_invalid_values() {
        let mut manager = CustomerManager::new();
        let err = manager.update_customer(0, "", "", "").unwrap_err();
        assert!(matches!(err, CustomerError::IndexOutOfRange(_)));
    }

    #[test]
    fn managers_keep_separate_id_sequences() {
        let mut first = CustomerManager::new();
        let mut second = CustomerManager::new();
        let _ = add(&mut first, "Ann", "Lee", "ann@x.com");
        let _ = add(&mut first, "Bob", "Roe", "bob@x.com");
        assert_eq!(
            add(&mut second, "Cat", "Poe", "cat@x.com"),
            AddOutcome::Added { id: 1, index: 0 }
        );
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut manager = CustomerManager::new();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        manager.delete_customer(0).unwrap();
        assert_eq!(
            add(&mut manager, "Ann", "Lee", "ann@x.com"),
            AddOutcome::Added { id: 2, index: 0 }
        );
    }

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl CustomerObserver for Recorder {
        fn on_added(&mut self, customer: &Customer) {
            self.log
                .borrow_mut()
                .push(format!("{} added {}", self.name, customer.id()));
        }
    }

    #[test]
    fn observers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = CustomerManager::new();
        manager.subscribe(Recorder {
            name: "first",
            log: Rc::clone(&log),
        });
        manager.subscribe(Recorder {
            name: "second",
            log: Rc::clone(&log),
        });

        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        manager.delete_customer(0).unwrap();

        assert_eq!(*log.borrow(), ["first added 1", "second added 1"]);
    }

    #[test]
    fn snapshot_and_lookup() {
        let mut manager = CustomerManager::new();
        let _ = add(&mut manager, "Ann", "Lee", "ann@x.com");
        let _ = add(&mut manager, "Bob", "Roe", "bob@x.com");

        let mut snapshot = manager.all_customers();
        snapshot[0].email = "changed@x.com".to_string();
        assert_eq!(manager.get(0).unwrap().email, "ann@x.com");

        let (index, bob) = manager.find_by_email("BOB@x.com").unwrap();
        assert_eq!(index, 1);
        assert_eq!(bob.first_name, "Bob");
        assert!(manager.find_by_email("nobody@x.com").is_none());
        assert_eq!(manager.iter().count(), 2);
    }
}
