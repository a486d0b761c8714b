//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use pagination::DEFAULT_PER_PAGE;

use crate::domain::ports::{
    AccessTokenVerifier, AppointmentCommand, AppointmentQuery, AppointmentRepository,
    BookingCommand, BookingQuery, BookingRepository, DomainEventPublisher, ImageStorage,
    LoginService, ProductCommand, ProductQuery, ProductRepository,
};
use crate::domain::{
    AppointmentService, BookingService, Clutch, Dress, ProductCatalogue, ProductService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub appointments: Arc<dyn AppointmentCommand>,
    pub appointments_query: Arc<dyn AppointmentQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub dresses: Arc<dyn ProductCommand<Dress>>,
    pub dresses_query: Arc<dyn ProductQuery<Dress>>,
    pub clutches: Arc<dyn ProductCommand<Clutch>>,
    pub clutches_query: Arc<dyn ProductQuery<Clutch>>,
}

/// Driven adapters the domain services are built over.
pub struct DrivenAdapters<A, B, D, C> {
    pub appointments: Arc<A>,
    pub bookings: Arc<B>,
    pub dresses: Arc<D>,
    pub clutches: Arc<C>,
    pub storage: Arc<dyn ImageStorage>,
    pub events: Arc<dyn DomainEventPublisher>,
    pub clock: Arc<dyn Clock>,
    /// Lifetime of presigned image URLs in responses.
    pub presign_ttl: Duration,
}

impl HttpStatePorts {
    /// Build every use-case service over `adapters`.
    ///
    /// Authentication stays separate because the login service owns the
    /// configured users and the token codec.
    pub fn from_adapters<A, B, D, C>(
        adapters: DrivenAdapters<A, B, D, C>,
        login: Arc<dyn LoginService>,
        tokens: Arc<dyn AccessTokenVerifier>,
    ) -> Self
    where
        A: AppointmentRepository + 'static,
        B: BookingRepository + 'static,
        D: ProductRepository<Dress> + 'static,
        C: ProductRepository<Clutch> + 'static,
    {
        let DrivenAdapters {
            appointments,
            bookings,
            dresses,
            clutches,
            storage,
            events,
            clock,
            presign_ttl,
        } = adapters;

        let appointment_service = Arc::new(AppointmentService::new(
            appointments,
            Arc::clone(&events),
            Arc::clone(&clock),
        ));
        let booking_service = Arc::new(
            BookingService::new(
                bookings,
                ProductCatalogue::new(Arc::clone(&dresses), Arc::clone(&clutches)),
                Arc::clone(&storage),
                Arc::clone(&events),
                Arc::clone(&clock),
            )
            .with_presign_ttl(presign_ttl),
        );
        let dress_service = Arc::new(
            ProductService::<Dress, D>::new(
                dresses,
                Arc::clone(&storage),
                Arc::clone(&events),
                Arc::clone(&clock),
            )
            .with_presign_ttl(presign_ttl),
        );
        let clutch_service = Arc::new(
            ProductService::<Clutch, C>::new(clutches, storage, events, clock)
                .with_presign_ttl(presign_ttl),
        );

        Self {
            login,
            tokens,
            appointments: appointment_service.clone(),
            appointments_query: appointment_service,
            bookings: booking_service.clone(),
            bookings_query: booking_service,
            dresses: dress_service.clone(),
            dresses_query: dress_service,
            clutches: clutch_service.clone(),
            clutches_query: clutch_service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn AccessTokenVerifier>,
    pub appointments: Arc<dyn AppointmentCommand>,
    pub appointments_query: Arc<dyn AppointmentQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub dresses: Arc<dyn ProductCommand<Dress>>,
    pub dresses_query: Arc<dyn ProductQuery<Dress>>,
    pub clutches: Arc<dyn ProductCommand<Clutch>>,
    pub clutches_query: Arc<dyn ProductQuery<Clutch>>,
    /// Whether the `access_token` cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// Page size used when a list request omits `limit`.
    pub default_page_size: u32,
}

impl HttpState {
    /// Construct state from a ports bundle with secure cookies and the
    /// default page size.
    ///
    /// # Examples
    /// ```
    /// use atelier::inbound::http::state::HttpState;
    /// use atelier::test_support::http::fixture_ports;
    ///
    /// let state = HttpState::new(fixture_ports()).with_cookie_secure(false);
    /// assert!(!state.cookie_secure);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            tokens,
            appointments,
            appointments_query,
            bookings,
            bookings_query,
            dresses,
            dresses_query,
            clutches,
            clutches_query,
        } = ports;
        Self {
            login,
            tokens,
            appointments,
            appointments_query,
            bookings,
            bookings_query,
            dresses,
            dresses_query,
            clutches,
            clutches_query,
            cookie_secure: true,
            default_page_size: DEFAULT_PER_PAGE,
        }
    }

    /// Override the cookie `Secure` flag.
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }

    /// Override the default page size; zero keeps the current value.
    #[must_use]
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.default_page_size = page_size;
        }
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
