//! Test helpers: canned OpenWeather bodies and a one-shot HTTP stub.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

pub const CURRENT_ISTANBUL: &str = r#"{
    "coord": {"lon": 28.9497, "lat": 41.0138},
    "weather": [{"id": 801, "main": "Clouds", "description": "az bulutlu", "icon": "02d"}],
    "base": "stations",
    "main": {"temp": 21.7, "feels_like": 21.4, "temp_min": 20.1, "temp_max": 22.9,
             "pressure": 1015, "humidity": 60},
    "visibility": 10000,
    "wind": {"speed": 4.12, "deg": 40},
    "clouds": {"all": 20},
    "dt": 1700000000,
    "sys": {"country": "TR", "sunrise": 1699936000, "sunset": 1699972000},
    "timezone": 10800,
    "id": 745044,
    "name": "Istanbul",
    "cod": 200
}"#;

/// Three 3-hour steps starting at 2023-11-14 22:13:20 UTC.
pub const FORECAST_ISTANBUL: &str = r#"{
    "cod": "200",
    "message": 0,
    "cnt": 3,
    "list": [
        {"dt": 1700000000,
         "main": {"temp": 21.7, "feels_like": 21.4, "pressure": 1015, "humidity": 60},
         "weather": [{"id": 801, "main": "Clouds", "description": "az bulutlu", "icon": "02n"}],
         "wind": {"speed": 4.1}, "dt_txt": "2023-11-14 22:13:20"},
        {"dt": 1700010800,
         "main": {"temp": 18.5, "feels_like": 18.0, "pressure": 1016, "humidity": 70},
         "weather": [{"id": 800, "main": "Clear", "description": "açık", "icon": "01n"}],
         "wind": {"speed": 3.0}, "dt_txt": "2023-11-15 01:13:20"},
        {"dt": 1700021600,
         "main": {"temp": -0.4, "feels_like": -3.2, "pressure": 1017, "humidity": 80},
         "weather": [{"id": 500, "main": "Rain", "description": "hafif yağmur", "icon": "10d"}],
         "wind": {"speed": 5.5}, "dt_txt": "2023-11-15 04:13:20"}
    ],
    "city": {"id": 745044, "name": "Istanbul", "country": "TR", "timezone": 10800}
}"#;

/// Serves exactly one HTTP response on a loopback port.
pub struct StubServer {
    base_url: String,
    handle: JoinHandle<String>,
}

impl StubServer {
    pub async fn respond_once(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        let body = body.into();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept stub connection");

            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.expect("read stub request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json; charset=utf-8\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len(),
            );
            socket.write_all(response.as_bytes()).await.expect("write stub response");
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request line the stub received, e.g. `GET /weather?q=... HTTP/1.1`.
    pub async fn request_line(self) -> String {
        self.handle.await.expect("stub task panicked")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Error",
    }
}
