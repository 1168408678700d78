pub mod recording_session;
