// In-memory PacketSource for tests
//
// FakeSource is moved into the AppState under test; the paired FakeHandle
// stays with the test to queue responses and inspect what was requested.

use crate::net::{
    Capabilities, PacketFilters, PacketPage, PacketRecord, PacketSource, Resource, SourceError,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Default)]
struct FakeState {
    pages: RefCell<VecDeque<Result<PacketPage, SourceError>>>,
    capabilities: RefCell<Capabilities>,
    fail_capabilities: Cell<bool>,
    fail_clear: Cell<bool>,
    fetches: Cell<usize>,
    clears: Cell<usize>,
    capability_checks: Cell<usize>,
    last_request: RefCell<Option<(usize, usize, PacketFilters)>>,
}

pub struct FakeSource {
    state: Rc<FakeState>,
}

#[derive(Clone)]
pub struct FakeHandle {
    state: Rc<FakeState>,
}

impl FakeSource {
    fn with_capabilities(capabilities: Capabilities) -> (Self, FakeHandle) {
        let state = Rc::new(FakeState::default());
        *state.capabilities.borrow_mut() = capabilities;
        (
            Self {
                state: Rc::clone(&state),
            },
            FakeHandle { state },
        )
    }

    /// Source whose session may read channels and messages
    pub fn granted(admin: bool) -> (Self, FakeHandle) {
        Self::with_capabilities(Capabilities::with_read(
            &[Resource::Channels, Resource::Messages],
            admin,
        ))
    }

    /// Source whose session has no permissions
    pub fn denied() -> (Self, FakeHandle) {
        Self::with_capabilities(Capabilities::default())
    }
}

fn unavailable(path: &str) -> SourceError {
    SourceError::Status {
        url: format!("http://fake{}", path),
        status: 503,
    }
}

impl PacketSource for FakeSource {
    fn fetch_packets(
        &self,
        offset: usize,
        limit: usize,
        filters: &PacketFilters,
    ) -> Result<PacketPage, SourceError> {
        self.state.fetches.set(self.state.fetches.get() + 1);
        *self.state.last_request.borrow_mut() = Some((offset, limit, *filters));
        self.state
            .pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(PacketPage::default()))
    }

    fn clear_packets(&self) -> Result<(), SourceError> {
        if self.state.fail_clear.get() {
            return Err(unavailable("/api/packets"));
        }
        self.state.clears.set(self.state.clears.get() + 1);
        Ok(())
    }

    fn fetch_capabilities(&self) -> Result<Capabilities, SourceError> {
        self.state
            .capability_checks
            .set(self.state.capability_checks.get() + 1);
        if self.state.fail_capabilities.get() {
            return Err(unavailable("/api/auth/status"));
        }
        Ok(self.state.capabilities.borrow().clone())
    }

    fn fetch_own_node_id(&self) -> Result<Option<String>, SourceError> {
        Ok(None)
    }
}

impl FakeHandle {
    pub fn push_page(&self, page: PacketPage) {
        self.state.pages.borrow_mut().push_back(Ok(page));
    }

    pub fn push_error(&self, status: u16) {
        self.state.pages.borrow_mut().push_back(Err(SourceError::Status {
            url: "http://fake/api/packets".to_string(),
            status,
        }));
    }

    pub fn set_capabilities(&self, capabilities: Capabilities) {
        *self.state.capabilities.borrow_mut() = capabilities;
    }

    pub fn fail_capabilities(&self, fail: bool) {
        self.state.fail_capabilities.set(fail);
    }

    pub fn fail_clear(&self, fail: bool) {
        self.state.fail_clear.set(fail);
    }

    pub fn fetch_count(&self) -> usize {
        self.state.fetches.get()
    }

    pub fn clear_count(&self) -> usize {
        self.state.clears.get()
    }

    pub fn capability_checks(&self) -> usize {
        self.state.capability_checks.get()
    }

    pub fn last_request(&self) -> Option<(usize, usize, PacketFilters)> {
        *self.state.last_request.borrow()
    }
}

/// Minimal decoded packet from a given source node
pub fn packet(id: i64, from_node: u32) -> PacketRecord {
    PacketRecord {
        id,
        timestamp: 1_700_000_000 + id,
        created_at: Some((1_700_000_000 + id) * 1000 + 250),
        from_node,
        from_node_id: Some(format!("!{:08x}", from_node)),
        to_node: Some(0x0bad_cafe),
        to_node_id: Some("!0badcafe".to_string()),
        channel: Some(0),
        portnum: 1,
        portnum_name: Some("TEXT_MESSAGE_APP".to_string()),
        payload_preview: Some(format!("message {}", id)),
        ..Default::default()
    }
}

pub fn page(packets: Vec<PacketRecord>, total: u64, max_count: u64) -> PacketPage {
    PacketPage {
        packets,
        total,
        max_count,
    }
}
