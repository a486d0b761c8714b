//! Booking domain service.
//!
//! A booking touches its products too: creating it reserves the expected
//! period on every booked product, starting and completing it picks the
//! products up and drops them off, and cancelling or deleting releases the
//! reservation. Products already in the target pick-up state are left as
//! they are, so a manual pick-up or drop-off never blocks the booking.
//! Product changes are staged and validated in memory before the booking
//! or any product is written.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use pagination::{SearchParams, SearchResult};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    BookingChanges, BookingCommand, BookingItemRequest, BookingQuery, BookingRepository,
    BookingView, CreateBookingRequest, DomainEventPublisher, ImageStorage, ProductRepository,
};
use crate::domain::service_support::{DEFAULT_PRESIGN_TTL, presign, publish_events};
use crate::domain::{
    AggregateRoot, Booking, BookingDraft, BookingFilter, BookingId, BookingItem, BookingPeriod,
    BookingStatus, BookingUpdate, Clutch, DomainEvent, Dress, EntityNotFoundError,
    EntityValidationError, Error, Money, Period, Product, ProductKind, RESERVATION_OVERLAP,
};

/// Change applied to one booked product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductChange {
    Reserve(Period),
    Release(Period),
    PickUp,
    DropOff,
}

impl ProductChange {
    fn apply<P: Product>(self, product: &mut P) {
        match self {
            Self::Reserve(period) => product.add_reservation_period(period),
            Self::Release(period) => {
                product.release_reservation(&period);
            }
            Self::PickUp => {
                if !product.core().is_picked_up() {
                    product.pick_up();
                }
            }
            Self::DropOff => {
                if product.core().is_picked_up() {
                    product.drop_off();
                }
            }
        }
    }

    /// Releases tolerate products deleted since the booking was made.
    fn requires_product(self) -> bool {
        !matches!(self, Self::Release(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProductStep {
    kind: ProductKind,
    product_id: Uuid,
    change: ProductChange,
}

fn steps_for(items: &[BookingItem], change: ProductChange) -> Vec<ProductStep> {
    items
        .iter()
        .map(|item| ProductStep {
            kind: item.kind(),
            product_id: item.product_id(),
            change,
        })
        .collect()
}

fn steps_for_all(items: &[BookingItem], changes: &[ProductChange]) -> Vec<ProductStep> {
    changes
        .iter()
        .flat_map(|change| steps_for(items, *change))
        .collect()
}

/// Product changes undoing whatever a booking in `status` still holds.
fn unwind_changes(booking: &Booking, status: BookingStatus) -> Vec<ProductChange> {
    let release = ProductChange::Release(reservation_of(booking));
    match status {
        BookingStatus::Cancelled => Vec::new(),
        BookingStatus::InProgress => vec![ProductChange::DropOff, release],
        BookingStatus::PaymentPending | BookingStatus::Ready | BookingStatus::Completed => {
            vec![release]
        }
    }
}

/// Products changed in memory and already validated.
#[derive(Debug, Default)]
struct StagedProducts {
    dresses: Vec<Dress>,
    clutches: Vec<Clutch>,
}

async fn find_products<P, R>(repo: &R, ids: &BTreeSet<Uuid>) -> Result<HashMap<Uuid, P>, Error>
where
    P: Product,
    R: ProductRepository<P>,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let typed: Vec<P::Id> = ids.iter().copied().map(P::Id::from).collect();
    let found = repo.find_by_ids(&typed).await?;
    Ok(found
        .into_iter()
        .map(|product| (product.core().id(), product))
        .collect())
}

fn ensure_found<P: Product>(
    found: &HashMap<Uuid, P>,
    required: impl IntoIterator<Item = Uuid>,
) -> Result<(), Error> {
    let missing: BTreeSet<Uuid> = required
        .into_iter()
        .filter(|id| !found.contains_key(id))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EntityNotFoundError::new(P::ENTITY_NAME, missing).into())
    }
}

async fn stage_kind<P, R>(repo: &R, steps: &[ProductStep]) -> Result<Vec<P>, Error>
where
    P: Product,
    R: ProductRepository<P>,
{
    let steps: Vec<&ProductStep> = steps.iter().filter(|step| step.kind == P::KIND).collect();
    let ids: BTreeSet<Uuid> = steps.iter().map(|step| step.product_id).collect();
    let mut products = find_products::<P, R>(repo, &ids).await?;
    ensure_found(
        &products,
        steps
            .iter()
            .filter(|step| step.change.requires_product())
            .map(|step| step.product_id),
    )?;

    for step in steps {
        if let Some(product) = products.get_mut(&step.product_id) {
            step.change.apply(product);
        }
    }
    for product in products.values() {
        ensure_reservable(product)?;
        product.ensure_valid()?;
    }
    Ok(products.into_values().collect())
}

/// A clash with another booking's reservation is a conflict, not bad input.
fn ensure_reservable<P: Product>(product: &P) -> Result<(), Error> {
    let notification = product.notification();
    let overlaps = notification
        .field_errors("reservation_periods")
        .iter()
        .any(|message| message == RESERVATION_OVERLAP);
    if overlaps {
        let id = product.core().id();
        return Err(Error::conflict(format!(
            "{} {id} is already reserved for an overlapping period",
            P::ENTITY_NAME
        ))
        .with_details(notification.to_json()));
    }
    Ok(())
}

/// Dress and clutch repositories as seen by bookings.
pub struct ProductCatalogue<D, C> {
    dresses: Arc<D>,
    clutches: Arc<C>,
}

impl<D, C> Clone for ProductCatalogue<D, C> {
    fn clone(&self) -> Self {
        Self {
            dresses: Arc::clone(&self.dresses),
            clutches: Arc::clone(&self.clutches),
        }
    }
}

impl<D, C> ProductCatalogue<D, C> {
    /// Pair the dress and clutch repositories.
    pub fn new(dresses: Arc<D>, clutches: Arc<C>) -> Self {
        Self { dresses, clutches }
    }
}

impl<D, C> ProductCatalogue<D, C>
where
    D: ProductRepository<Dress>,
    C: ProductRepository<Clutch>,
{
    /// Snapshot the requested products into booking items, in request order.
    async fn snapshot(&self, requests: &[BookingItemRequest]) -> Result<Vec<BookingItem>, Error> {
        let ids_of = |kind: ProductKind| -> BTreeSet<Uuid> {
            requests
                .iter()
                .filter(|request| request.kind == kind)
                .map(|request| request.product_id)
                .collect()
        };
        let dress_ids = ids_of(ProductKind::Dress);
        let clutch_ids = ids_of(ProductKind::Clutch);
        let dresses = find_products::<Dress, D>(&self.dresses, &dress_ids).await?;
        ensure_found(&dresses, dress_ids)?;
        let clutches = find_products::<Clutch, C>(&self.clutches, &clutch_ids).await?;
        ensure_found(&clutches, clutch_ids)?;

        requests
            .iter()
            .map(|request| {
                let adjustments = request.adjustments.clone();
                let item = match request.kind {
                    ProductKind::Dress => dresses
                        .get(&request.product_id)
                        .map(|dress| BookingItem::from_product(dress, adjustments)),
                    ProductKind::Clutch => clutches
                        .get(&request.product_id)
                        .map(|clutch| BookingItem::from_product(clutch, adjustments)),
                };
                item.ok_or_else(|| {
                    let entity = match request.kind {
                        ProductKind::Dress => Dress::ENTITY_NAME,
                        ProductKind::Clutch => Clutch::ENTITY_NAME,
                    };
                    Error::from(EntityNotFoundError::new(entity, [request.product_id]))
                })
            })
            .collect()
    }

    async fn stage(&self, steps: &[ProductStep]) -> Result<StagedProducts, Error> {
        Ok(StagedProducts {
            dresses: stage_kind::<Dress, D>(&self.dresses, steps).await?,
            clutches: stage_kind::<Clutch, C>(&self.clutches, steps).await?,
        })
    }

    async fn save(&self, staged: StagedProducts) -> Result<Vec<DomainEvent>, Error> {
        let mut events = Vec::new();
        for mut dress in staged.dresses {
            self.dresses.save(&dress).await?;
            events.extend(dress.drain_events());
        }
        for mut clutch in staged.clutches {
            self.clutches.save(&clutch).await?;
            events.extend(clutch.drain_events());
        }
        Ok(events)
    }
}

/// Booking service implementing the booking command and query ports.
pub struct BookingService<B, D, C> {
    repo: Arc<B>,
    catalogue: ProductCatalogue<D, C>,
    storage: Arc<dyn ImageStorage>,
    events: Arc<dyn DomainEventPublisher>,
    clock: Arc<dyn Clock>,
    presign_ttl: Duration,
}

impl<B, D, C> Clone for BookingService<B, D, C> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            catalogue: self.catalogue.clone(),
            storage: Arc::clone(&self.storage),
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
            presign_ttl: self.presign_ttl,
        }
    }
}

impl<B, D, C> BookingService<B, D, C> {
    /// Create a service over the booking repository and product catalogue.
    pub fn new(
        repo: Arc<B>,
        catalogue: ProductCatalogue<D, C>,
        storage: Arc<dyn ImageStorage>,
        events: Arc<dyn DomainEventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            catalogue,
            storage,
            events,
            clock,
            presign_ttl: DEFAULT_PRESIGN_TTL,
        }
    }

    /// Override how long presigned image URLs stay valid.
    #[must_use]
    pub fn with_presign_ttl(mut self, presign_ttl: Duration) -> Self {
        self.presign_ttl = presign_ttl;
        self
    }
}

impl<B, D, C> BookingService<B, D, C>
where
    B: BookingRepository,
    D: ProductRepository<Dress>,
    C: ProductRepository<Clutch>,
{
    async fn load(&self, id: BookingId) -> Result<Booking, Error> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| EntityNotFoundError::new("Booking", [id]).into())
    }

    async fn view(&self, booking: Booking) -> Result<BookingView, Error> {
        let storage = self.storage.as_ref();
        let urls = try_join_all(booking.items().iter().map(|item| async move {
            let url = presign(storage, item.image_path(), self.presign_ttl).await?;
            Ok::<_, Error>((item.id(), url))
        }))
        .await?;
        Ok(BookingView {
            image_urls: urls.into_iter().collect(),
            booking,
        })
    }

    /// Save the booking, then the staged products, then publish everything.
    async fn commit(
        &self,
        mut booking: Booking,
        staged: StagedProducts,
    ) -> Result<BookingView, Error> {
        self.repo.save(&booking).await?;
        let mut events = booking.drain_events();
        events.extend(self.catalogue.save(staged).await?);
        publish_events(self.events.as_ref(), events).await;
        info!(
            booking_id = %booking.id(),
            status = %booking.status(),
            "booking saved"
        );
        self.view(booking).await
    }

    /// Apply a transition and its effect on the booked products.
    async fn transition<F>(
        &self,
        id: BookingId,
        apply: F,
        effect: ProductEffect,
    ) -> Result<BookingView, Error>
    where
        F: FnOnce(&mut Booking) + Send,
    {
        let mut booking = self.load(id).await?;
        let before = booking.status();
        apply(&mut booking);
        booking.ensure_valid()?;
        let changes = effect.changes_for(&booking, before);
        let staged = if changes.is_empty() {
            StagedProducts::default()
        } else {
            self.catalogue
                .stage(&steps_for_all(booking.items(), &changes))
                .await?
        };
        self.commit(booking, staged).await
    }

    fn today(&self) -> chrono::NaiveDate {
        self.clock.utc().date_naive()
    }

    fn expected_period(
        &self,
        pick_up_date: chrono::NaiveDate,
        return_date: Option<chrono::NaiveDate>,
    ) -> Result<BookingPeriod, Error> {
        BookingPeriod::create(pick_up_date, return_date, self.today()).map_err(|err| {
            Error::from(EntityValidationError::new(
                err.into_field_notification("expected_period"),
            ))
        })
    }
}

fn reservation_of(booking: &Booking) -> Period {
    booking.expected_period().reservation(booking.event_date())
}

/// What a booking transition does to the booked products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductEffect {
    Nothing,
    PickUp,
    DropOff,
    Unwind,
}

impl ProductEffect {
    /// `before` is the booking status prior to the transition.
    fn changes_for(self, booking: &Booking, before: BookingStatus) -> Vec<ProductChange> {
        match self {
            Self::Nothing => Vec::new(),
            Self::PickUp => vec![ProductChange::PickUp],
            Self::DropOff => vec![ProductChange::DropOff],
            Self::Unwind => unwind_changes(booking, before),
        }
    }
}

#[async_trait]
impl<B, D, C> BookingCommand for BookingService<B, D, C>
where
    B: BookingRepository,
    D: ProductRepository<Dress>,
    C: ProductRepository<Clutch>,
{
    async fn create(&self, request: CreateBookingRequest) -> Result<BookingView, Error> {
        let CreateBookingRequest {
            customer_name,
            event_date,
            pick_up_date,
            return_date,
            items,
            amount_paid,
        } = request;
        let expected_period = self.expected_period(pick_up_date, return_date)?;
        let items = self.catalogue.snapshot(&items).await?;
        let booking = Booking::create(
            BookingDraft {
                customer_name,
                event_date,
                expected_period,
                items,
                amount_paid,
            },
            self.clock.utc(),
        );
        booking.ensure_valid()?;

        let steps = steps_for(
            booking.items(),
            ProductChange::Reserve(reservation_of(&booking)),
        );
        let staged = self.catalogue.stage(&steps).await?;
        self.commit(booking, staged).await
    }

    async fn add_payment(&self, id: BookingId, amount: Money) -> Result<BookingView, Error> {
        self.transition(
            id,
            move |booking| booking.add_payment(amount),
            ProductEffect::Nothing,
        )
        .await
    }

    async fn start(&self, id: BookingId) -> Result<BookingView, Error> {
        let today = self.today();
        self.transition(
            id,
            move |booking| booking.start(today),
            ProductEffect::PickUp,
        )
        .await
    }

    async fn complete(&self, id: BookingId) -> Result<BookingView, Error> {
        let today = self.today();
        self.transition(
            id,
            move |booking| booking.complete(today),
            ProductEffect::DropOff,
        )
        .await
    }

    async fn update(&self, id: BookingId, changes: BookingChanges) -> Result<BookingView, Error> {
        let mut booking = self.load(id).await?;
        let expected_period = if changes.moves_period() {
            let current = booking.expected_period();
            Some(self.expected_period(
                changes.pick_up_date.unwrap_or(current.pick_up_date()),
                changes.return_date.or(current.return_date()),
            )?)
        } else {
            None
        };
        let before = reservation_of(&booking);
        booking.update(BookingUpdate {
            customer_name: changes.customer_name,
            event_date: changes.event_date,
            expected_period,
        });
        booking.ensure_valid()?;

        let after = reservation_of(&booking);
        let staged = if after == before {
            StagedProducts::default()
        } else {
            let changes = [ProductChange::Release(before), ProductChange::Reserve(after)];
            self.catalogue
                .stage(&steps_for_all(booking.items(), &changes))
                .await?
        };
        self.commit(booking, staged).await
    }

    async fn cancel(&self, id: BookingId) -> Result<BookingView, Error> {
        self.transition(id, Booking::cancel, ProductEffect::Unwind)
            .await
    }

    async fn replace_items(
        &self,
        id: BookingId,
        items: Vec<BookingItemRequest>,
    ) -> Result<BookingView, Error> {
        let mut booking = self.load(id).await?;
        let reservation = reservation_of(&booking);
        let mut steps = steps_for(booking.items(), ProductChange::Release(reservation));

        let items = self.catalogue.snapshot(&items).await?;
        booking.add_many_items(items);
        booking.ensure_valid()?;

        steps.extend(steps_for(
            booking.items(),
            ProductChange::Reserve(reservation),
        ));
        let staged = self.catalogue.stage(&steps).await?;
        self.commit(booking, staged).await
    }

    async fn delete(&self, id: BookingId) -> Result<(), Error> {
        let booking = self.load(id).await?;
        let removed = self.repo.delete(&id).await?;
        if !removed {
            return Err(EntityNotFoundError::new("Booking", [id]).into());
        }

        let changes = unwind_changes(&booking, booking.status());
        if !changes.is_empty() {
            let steps = steps_for_all(booking.items(), &changes);
            let staged = self.catalogue.stage(&steps).await?;
            let events = self.catalogue.save(staged).await?;
            publish_events(self.events.as_ref(), events).await;
        }
        info!(booking_id = %id, "booking deleted");
        Ok(())
    }
}

#[async_trait]
impl<B, D, C> BookingQuery for BookingService<B, D, C>
where
    B: BookingRepository,
    D: ProductRepository<Dress>,
    C: ProductRepository<Clutch>,
{
    async fn get(&self, id: BookingId) -> Result<BookingView, Error> {
        let booking = self.load(id).await?;
        self.view(booking).await
    }

    async fn search(
        &self,
        params: SearchParams<BookingFilter>,
    ) -> Result<SearchResult<BookingView>, Error> {
        let result = self.repo.search(&params).await?;
        let (total, page, per_page) = (result.total(), result.current_page(), result.per_page());
        let views = try_join_all(result.into_items().into_iter().map(|b| self.view(b))).await?;
        Ok(SearchResult::new(views, total, page, per_page))
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
