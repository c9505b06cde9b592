use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use trip_api::MoveDirection;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    SubmitLogin,
    SubmitRegister,
    Logout,
    LoadTrips,
    SubmitTripForm,
    DuplicateTrip {
        trip_id: i64,
    },
    OpenTrip {
        trip_id: i64,
    },
    LoadWeather,
    SubmitDetailForm,
    MoveDestination {
        destination_id: i64,
        direction: MoveDirection,
    },
    ConfirmDelete,
    ExportTrip,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
