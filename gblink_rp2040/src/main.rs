#![no_std]
#![no_main]

mod board;
mod host;
mod link;

use rp_pico as bsp;

use defmt_rtt as _;
use panic_probe as _;

use bsp::{
    entry,
    hal::{
        clocks::init_clocks_and_plls,
        gpio::{OutputDriveStrength, OutputSlewRate},
        pac::{self, interrupt},
        sio::Sio,
        watchdog::Watchdog,
        Clock,
    },
};
use core::cell::RefCell;
use cortex_m::interrupt::{free, Mutex};
use embedded_hal::digital::v2::OutputPin;

use gblink::{select_mode, ByteQueue, HostOutput, Mode, Session, DEFAULT_CAPACITY, GREETING};
use host::HostSerial;
use link::{LinkPins, SinPin};

/// Everything the interrupt handlers need once a mode is armed
struct Armed {
    session: Session,
    queue: ByteQueue<DEFAULT_CAPACITY>,
    link: LinkPins,
    host: HostSerial,
}

static ARMED: Mutex<RefCell<Option<Armed>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let mut core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // External high-speed crystal on the pico board is 12Mhz
    let external_xtal_freq_hz = bsp::XOSC_CRYSTAL_FREQ;
    let clocks = init_clocks_and_plls(
        external_xtal_freq_hz,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let uart_pins = (
        pins.gpio0.into_function().into_pull_type(),
        pins.gpio1.into_function().into_pull_type(),
    );
    let mut host = HostSerial::new(
        pac.UART0,
        uart_pins,
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
    )
    .ok()
    .unwrap();

    host.discard_pending();
    host.send_all(GREETING);
    defmt::info!("waiting for mode command");

    let mode = loop {
        let commands = host.commands().inspect(|b| {
            if Mode::try_from(*b).is_err() {
                defmt::debug!("ignoring command byte {=u8:#x}", *b);
            }
        });
        if let Some(mode) = select_mode(commands) {
            break mode;
        }
    };

    let sin = if mode.drives_link() {
        let mut pin: board::SinDrivenPin = pins.gpio3.into_push_pull_output();
        pin.set_slew_rate(OutputSlewRate::Fast);
        pin.set_drive_strength(OutputDriveStrength::TwelveMilliAmps);
        let _ = pin.set_low();
        SinPin::Driven(pin)
    } else {
        SinPin::Observed(pins.gpio3.into_floating_input())
    };
    let mut link = LinkPins::new(
        pins.gpio2.into_floating_input(),
        sin,
        pins.gpio4.into_floating_input(),
        pins.gpio5.into_floating_input(),
    );

    let mut queue = ByteQueue::new();
    let session = Session::arm(mode, &mut queue);
    link.enable_clock_interrupt();
    if mode.drives_link() {
        host.enable_rx_interrupt();
    }
    free(|cs| {
        ARMED.borrow(cs).replace(Some(Armed {
            session,
            queue,
            link,
            host,
        }))
    });

    // SAFETY: the handlers only touch state stored in ARMED, which is fully set up above.
    unsafe {
        core.NVIC
            .set_priority(pac::Interrupt::IO_IRQ_BANK0, board::CLOCK_EDGE_PRIORITY);
        pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0);
        if mode.drives_link() {
            core.NVIC
                .set_priority(pac::Interrupt::UART0_IRQ, board::HOST_RX_PRIORITY);
            pac::NVIC::unmask(pac::Interrupt::UART0_IRQ);
        }
    }

    let mut led = pins.led.into_push_pull_output();
    let _ = led.set_high();
    defmt::info!("armed {}", mode);

    loop {
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn IO_IRQ_BANK0() {
    free(|cs| {
        if let Some(armed) = ARMED.borrow(cs).borrow_mut().as_mut() {
            let Armed {
                session,
                queue,
                link,
                host,
            } = armed;
            for edge in link.take_edges().into_iter().flatten() {
                session.on_clock_edge(edge, link, host, queue);
            }
        }
    });
}

// One critical section per byte, so a clock edge waits for a single `on_host_byte` at most.
#[interrupt]
fn UART0_IRQ() {
    loop {
        let drained = free(|cs| {
            let mut armed = ARMED.borrow(cs).borrow_mut();
            let Some(Armed {
                session,
                queue,
                link,
                host,
            }) = armed.as_mut()
            else {
                return true;
            };
            match host.try_read() {
                Some(byte) => {
                    session.on_host_byte(byte, link, queue);
                    false
                }
                None => true,
            }
        });
        if drained {
            break;
        }
    }
}
